//! External Collaborator Seams
//!
//! The vault consumes four external services: the AMM pool, the
//! lending market, the token ledger and the access/pause gate. Their
//! internals (tick math, liquidity-for-amounts, interest model, token
//! bookkeeping) are out of scope and trusted; the vault treats every
//! return value and failure as authoritative and never assumes
//! success.
//!
//! All token movement is performed by the vault through the
//! [`TokenLedger`], with the pool and market exposing their ledger
//! identity via `address()`. The protocol traits therefore carry
//! accounting only, which keeps every state owner single-writer.

use rangevault_common::{
    Address, LendingPositionData, SwapDirection, TickRange, VaultResult,
};

// ============ AMM Pool ============

/// Live pool-side position state, keyed by `(owner, range)`.
/// Owned by the pool, referenced by the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolPosition {
    /// Active liquidity in the range
    pub liquidity: u64,
    /// Trading fees accrued but not yet collected, asset0
    pub tokens_owed0: u64,
    /// Trading fees accrued but not yet collected, asset1
    pub tokens_owed1: u64,
}

/// Result of burning all liquidity in a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemovedLiquidity {
    /// Liquidity burned
    pub liquidity: u64,
    /// Principal returned, asset0
    pub burned0: u64,
    /// Principal returned, asset1
    pub burned1: u64,
    /// Trading fees owed at burn time, asset0
    pub fee0: u64,
    /// Trading fees owed at burn time, asset1
    pub fee1: u64,
}

/// Result of a pool swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Amount actually consumed from the input asset
    pub amount_in: u64,
    /// Amount received in the output asset
    pub amount_out: u64,
}

/// The concentrated-liquidity AMM pool the vault positions into.
///
/// Tick math and the liquidity-for-amounts formula live behind this
/// trait; the vault only validates ranges against `tick_spacing()`
/// and the global bounds.
pub trait AmmPool {
    /// The pool's ledger identity (holds position principal and fees)
    fn address(&self) -> Address;

    /// Spacing between usable ticks for this pool's fee tier
    fn tick_spacing(&self) -> i32;

    /// Current price: asset1 base units per asset0 base unit,
    /// scaled by `precision::PRICE_ONE`
    fn current_price(&self) -> u64;

    /// Add the maximal liquidity obtainable from the two amounts at
    /// the current price. Returns `(liquidity_delta, used0, used1)`;
    /// used amounts may be less than requested.
    fn add_liquidity(
        &mut self,
        owner: Address,
        range: TickRange,
        amount0: u64,
        amount1: u64,
    ) -> VaultResult<(u64, u64, u64)>;

    /// Read the live position for `(owner, range)`
    fn position(&self, owner: Address, range: TickRange) -> PoolPosition;

    /// Principal amounts currently backing `liquidity` in `range`
    /// at the pool's current price
    fn amounts_for_liquidity(&self, range: TickRange, liquidity: u64) -> (u64, u64);

    /// Burn all liquidity in `range`, converting principal and owed
    /// fees into collectable amounts
    fn burn_all(&mut self, owner: Address, range: TickRange) -> VaultResult<RemovedLiquidity>;

    /// Collect everything owed to `(owner, range)`; returns
    /// `(amount0, amount1)` now transferable from the pool's address
    fn collect(&mut self, owner: Address, range: TickRange) -> VaultResult<(u64, u64)>;

    /// Swap against the pool, bounded by `price_limit`. Fails with
    /// `PriceLimitReached` when the limit allows zero fill.
    fn swap(
        &mut self,
        owner: Address,
        direction: SwapDirection,
        amount_in: u64,
        price_limit: u64,
    ) -> VaultResult<SwapOutcome>;
}

// ============ Lending Market ============

/// The lending market the vault supplies collateral to and borrows
/// the pegged asset from.
///
/// Supply/withdraw amounts are asset1 base units; borrow/repay
/// amounts are asset0 base units. `account_data` aggregates in the
/// market's base currency (asset1).
pub trait LendingMarket {
    /// The market's ledger identity (holds supplied collateral)
    fn address(&self) -> Address;

    /// Record `amount` of supplied collateral for `owner`
    fn supply(&mut self, owner: Address, amount: u64) -> VaultResult<()>;

    /// Release collateral; fails with `HealthFactorBreach` if the
    /// remaining collateral no longer covers outstanding debt.
    /// Returns the amount actually released.
    fn withdraw(&mut self, owner: Address, amount: u64) -> VaultResult<u64>;

    /// Borrow `amount` of the pegged asset against collateral; fails
    /// with `InsufficientBorrowPower` on an LTV breach
    fn borrow(&mut self, owner: Address, amount: u64) -> VaultResult<()>;

    /// Repay outstanding debt; returns the amount actually applied
    fn repay(&mut self, owner: Address, amount: u64) -> VaultResult<u64>;

    /// Supplied collateral in asset1 base units
    fn supplied(&self, owner: Address) -> u64;

    /// Outstanding debt in asset0 base units
    fn debt(&self, owner: Address) -> u64;

    /// Largest withdrawal currently permitted without breaching the
    /// market's minimum health factor
    fn max_withdrawable(&self, owner: Address) -> u64;

    /// Live aggregated account view in base-currency units
    fn account_data(&self, owner: Address) -> LendingPositionData;
}

// ============ Token Ledger ============

/// Balance bookkeeping for the two pool assets and the borrowed
/// asset. Standard transfer semantics; `mint`/`burn` exist for the
/// pegged borrowed asset, which is created on borrow and destroyed
/// on repay.
pub trait TokenLedger {
    fn balance_of(&self, asset: Address, owner: Address) -> u64;

    /// Move `amount`; fails with `InsufficientBalance`
    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> VaultResult<()>;

    fn mint(&mut self, asset: Address, to: Address, amount: u64) -> VaultResult<()>;

    fn burn(&mut self, asset: Address, from: Address, amount: u64) -> VaultResult<()>;
}

// ============ Access / Pause Gate ============

/// Manager authorization and the mint/burn pause switch.
/// External collaborator; the vault consults it at every
/// state-mutating operation prologue.
pub trait AccessGate {
    fn is_manager(&self, caller: Address) -> bool;

    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);
}
