//! Core Types for the rangevault Protocol
//!
//! Fundamental data structures shared across the vault core and the
//! factory.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Type alias for vault identifiers
pub type VaultId = [u8; 32];

/// The all-zero address, valid for no identity
pub const ZERO_ADDRESS: Address = [0u8; 32];

// ============ Range Types ============

/// A validated-or-not pair of ticks bounding an AMM position.
///
/// Construction does not validate; `validation::validate_ticks`
/// is the single authority on whether a range is usable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct TickRange {
    /// Lower bound of the position, inclusive
    pub lower: i32,
    /// Upper bound of the position, exclusive at the grid level
    pub upper: i32,
}

impl TickRange {
    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }
}

// ============ Amount Sentinel ============

/// An amount argument that may mean "everything".
///
/// An explicit tagged alternative to overloading a reserved
/// maximum value. `All` is resolved against the live position at
/// the start of the operation that consumes it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum Amount {
    /// Exactly this many base units
    Exact(u64),
    /// The entire position as measured at call time
    All,
}

impl Amount {
    /// Resolve the sentinel against the live "everything" value.
    pub fn resolve(self, all_value: u64) -> u64 {
        match self {
            Amount::Exact(n) => n,
            Amount::All => all_value,
        }
    }
}

// ============ Swap Types ============

/// Direction of a pool swap.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum SwapDirection {
    /// Sell asset0, receive asset1
    ZeroForOne,
    /// Sell asset1, receive asset0
    OneForZero,
}

// ============ Holder Ledger Types ============

/// Per-holder ledger record.
///
/// Created lazily on first mint and never deleted; a balance may
/// return to zero, in which case only the `exists` display flag is
/// cleared. `token` tracks the holder's proportional underlying
/// claim bookkeeping and moves with shares on transfer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize,
    BorshDeserialize,
)]
pub struct HolderRecord {
    /// Share balance
    pub shares: u64,
    /// Deposited-underlying bookkeeping, in asset1 base units
    pub token: u64,
    /// Display flag; cleared when the balance returns to zero
    pub exists: bool,
}

/// A holder record paired with its address, as returned by
/// paginated enumeration reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVaultView {
    pub user: Address,
    pub shares: u64,
    pub token: u64,
}

// ============ Read-only Views ============

/// Snapshot of the vault's pool-facing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolData {
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub in_position: bool,
}

/// Snapshot of the fee engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeData {
    pub managing_fee_bps: u16,
    pub performance_fee_bps: u16,
    /// Accrued manager balance in asset0 base units
    pub manager_balance0: u64,
    /// Accrued manager balance in asset1 base units
    pub manager_balance1: u64,
}

/// Live view into the vault's lending-market account.
///
/// Not owned by the vault: recomputed from the lending market on
/// every read. Values are in the market's base currency (asset1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPositionData {
    /// Supplied collateral value
    pub collateral: u64,
    /// Outstanding debt value
    pub debt: u64,
    /// Remaining borrowing power
    pub available_to_borrow: u64,
    /// Liquidation threshold in BPS
    pub liquidation_threshold: u64,
    /// Loan-to-value bound in BPS
    pub loan_to_value: u64,
    /// Distance from liquidation, scaled by `precision::PRICE_ONE`;
    /// `u64::MAX` when there is no debt
    pub health_factor: u64,
}
