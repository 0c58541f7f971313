//! Protocol Events for rangevault
//!
//! Events are recorded during vault execution and can be indexed
//! off-process for UIs, analytics and notifications.

use crate::types::{Address, VaultId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Share Ledger Events (0x01 - 0x1F)
    Minted = 0x01,
    Burned = 0x02,
    SharesTransferred = 0x03,

    // Position Events (0x20 - 0x3F)
    TicksSet = 0x20,
    LiquidityAdded = 0x21,
    LiquidityRemoved = 0x22,
    PositionStatusSet = 0x23,
    Swapped = 0x24,

    // Fee Events (0x40 - 0x5F)
    FeesUpdated = 0x40,
    FeesEarned = 0x41,
    ManagerCollected = 0x42,

    // Collateral/Borrow Events (0x60 - 0x7F)
    CollateralSupplied = 0x60,
    CollateralWithdrawn = 0x61,
    DebtMinted = 0x62,
    DebtRepaid = 0x63,

    // Gate Events (0x80 - 0x9F)
    Paused = 0x80,
    Unpaused = 0x81,

    // Factory Events (0xA0 - 0xBF)
    VaultCreated = 0xA0,
    VaultUpgraded = 0xA1,
    OwnershipTransferred = 0xA2,
}

/// Main event enum containing all possible protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum VaultEvent {
    // ============ Share Ledger Events ============

    /// Shares minted against a deposit
    Minted {
        receiver: Address,
        shares: u64,
        amount: u64,
    },

    /// Shares burned for a withdrawal; `fee` is the managing cut
    Burned {
        receiver: Address,
        shares: u64,
        amount: u64,
        fee: u64,
    },

    /// Shares (and proportional claim bookkeeping) moved between holders
    SharesTransferred {
        from: Address,
        to: Address,
        shares: u64,
        token_moved: u64,
    },

    // ============ Position Events ============

    /// Position range overwritten by the manager
    TicksSet { lower_tick: i32, upper_tick: i32 },

    /// Liquidity added to the pool position
    LiquidityAdded {
        liquidity: u64,
        lower_tick: i32,
        upper_tick: i32,
        amount0: u64,
        amount1: u64,
    },

    /// All liquidity burned back into idle balances
    LiquidityRemoved {
        liquidity: u64,
        lower_tick: i32,
        upper_tick: i32,
        amount0: u64,
        amount1: u64,
    },

    /// The in-position flag changed
    PositionStatusSet { in_position: bool },

    /// Idle-balance recomposition through the pool
    Swapped {
        zero_for_one: bool,
        amount_in: u64,
        amount_out: u64,
    },

    // ============ Fee Events ============

    /// Fee rates overwritten
    FeesUpdated {
        managing_fee_bps: u16,
        performance_fee_bps: u16,
    },

    /// Trading fees harvested from the pool (gross, pre performance cut)
    FeesEarned { fee0: u64, fee1: u64 },

    /// Accrued manager balances paid out
    ManagerCollected { amount0: u64, amount1: u64 },

    // ============ Collateral/Borrow Events ============

    /// Idle asset1 supplied to the lending market
    CollateralSupplied { amount: u64 },

    /// Collateral withdrawn back to idle
    CollateralWithdrawn { amount: u64 },

    /// Borrowed asset minted against collateral
    DebtMinted { amount: u64 },

    /// Outstanding debt repaid
    DebtRepaid { amount: u64 },

    // ============ Gate Events ============

    /// Mint/burn disabled
    Paused { by: Address },

    /// Mint/burn re-enabled
    Unpaused { by: Address },

    // ============ Factory Events ============

    /// A vault was registered
    VaultCreated { vault_id: VaultId, manager: Address },

    /// A vault's active implementation reference changed
    VaultUpgraded { vault_id: VaultId, implementation: VaultId },

    /// Factory ownership moved
    OwnershipTransferred { previous: Address, new: Address },
}

impl VaultEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Minted { .. } => EventType::Minted,
            Self::Burned { .. } => EventType::Burned,
            Self::SharesTransferred { .. } => EventType::SharesTransferred,
            Self::TicksSet { .. } => EventType::TicksSet,
            Self::LiquidityAdded { .. } => EventType::LiquidityAdded,
            Self::LiquidityRemoved { .. } => EventType::LiquidityRemoved,
            Self::PositionStatusSet { .. } => EventType::PositionStatusSet,
            Self::Swapped { .. } => EventType::Swapped,
            Self::FeesUpdated { .. } => EventType::FeesUpdated,
            Self::FeesEarned { .. } => EventType::FeesEarned,
            Self::ManagerCollected { .. } => EventType::ManagerCollected,
            Self::CollateralSupplied { .. } => EventType::CollateralSupplied,
            Self::CollateralWithdrawn { .. } => EventType::CollateralWithdrawn,
            Self::DebtMinted { .. } => EventType::DebtMinted,
            Self::DebtRepaid { .. } => EventType::DebtRepaid,
            Self::Paused { .. } => EventType::Paused,
            Self::Unpaused { .. } => EventType::Unpaused,
            Self::VaultCreated { .. } => EventType::VaultCreated,
            Self::VaultUpgraded { .. } => EventType::VaultUpgraded,
            Self::OwnershipTransferred { .. } => EventType::OwnershipTransferred,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<VaultEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<VaultEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&VaultEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true when no events were emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
