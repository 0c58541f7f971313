//! Vault State
//!
//! The single mutable state record for one vault instance. Owned
//! exclusively by the [`crate::vault::Vault`] orchestrator and
//! mutated only through its operations.
//!
//! Invariants maintained across every operation:
//! - `total_shares` equals the sum of all holder share balances
//! - the stored tick range has passed the range validator
//! - fee rates never exceed their caps (enforced by `FeeState`)
//! - at most one pool position is open at a time

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use rangevault_common::{Address, FeeState, HolderRecord, UserVaultView, Vec};

/// State for one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultState {
    /// The vault's own ledger identity (holds the idle balances)
    pub address: Address,
    /// Pool asset0 = the borrowed/pegged asset
    pub asset0: Address,
    /// Pool asset1 = the deposit/quote asset (unit of account)
    pub asset1: Address,
    /// Lower bound of the configured position range
    pub lower_tick: i32,
    /// Upper bound of the configured position range
    pub upper_tick: i32,
    /// True while a pool position is open at the configured range
    pub in_position: bool,
    /// Fee rates and accrued manager balances
    pub fees: FeeState,
    /// Total ownership shares outstanding
    pub total_shares: u64,
    /// Per-holder ledger records, created lazily, never deleted
    holders: std::collections::BTreeMap<Address, HolderRecord>,
    /// Holder addresses in first-mint order, for enumeration
    holder_index: Vec<Address>,
    /// In-flight-operation flag; rejects nested entry
    pub(crate) entered: bool,
}

impl VaultState {
    /// Create state for a fresh vault. The tick range starts at
    /// `(0, 0)` and must be set through `update_ticks` before any
    /// liquidity is added.
    pub fn new(address: Address, asset0: Address, asset1: Address) -> Self {
        Self {
            address,
            asset0,
            asset1,
            lower_tick: 0,
            upper_tick: 0,
            in_position: false,
            fees: FeeState::default(),
            total_shares: 0,
            holders: std::collections::BTreeMap::new(),
            holder_index: Vec::new(),
            entered: false,
        }
    }

    /// Read a holder record, if one was ever created.
    pub fn holder(&self, user: Address) -> Option<&HolderRecord> {
        self.holders.get(&user)
    }

    /// Mutable handle to a holder record, creating it on first use.
    /// New holders are appended to the enumeration index exactly once.
    pub fn holder_mut(&mut self, user: Address) -> &mut HolderRecord {
        if !self.holders.contains_key(&user) {
            self.holder_index.push(user);
        }
        self.holders.entry(user).or_default()
    }

    /// Number of holders that have ever minted or received shares.
    pub fn holder_count(&self) -> usize {
        self.holder_index.len()
    }

    /// Paginated holder enumeration in first-mint order over the
    /// inclusive index range `[from, to]`, clamped to the index and
    /// to `MAX_HOLDER_PAGE` entries.
    pub fn holder_page(&self, from: usize, to: usize) -> Vec<UserVaultView> {
        let end = to.min(self.holder_index.len().saturating_sub(1));
        if self.holder_index.is_empty() || from > end {
            return Vec::new();
        }
        self.holder_index[from..=end]
            .iter()
            .take(rangevault_common::constants::limits::MAX_HOLDER_PAGE)
            .map(|user| {
                let record = self.holders.get(user).copied().unwrap_or_default();
                UserVaultView { user: *user, shares: record.shares, token: record.token }
            })
            .collect()
    }

    /// Sum of all holder share balances; always equals `total_shares`.
    /// Used by tests to assert the invariant directly.
    pub fn share_sum(&self) -> u64 {
        self.holders.values().map(|r| r.shares).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        [n; 32]
    }

    #[test]
    fn test_holder_created_once() {
        let mut state = VaultState::new(addr(9), addr(1), addr(2));
        assert_eq!(state.holder_count(), 0);

        state.holder_mut(addr(3)).shares = 100;
        state.holder_mut(addr(3)).shares = 200;
        assert_eq!(state.holder_count(), 1);

        state.holder_mut(addr(4));
        assert_eq!(state.holder_count(), 2);
    }

    #[test]
    fn test_holder_page_clamped() {
        let mut state = VaultState::new(addr(9), addr(1), addr(2));
        for i in 0..5u8 {
            let record = state.holder_mut(addr(10 + i));
            record.shares = (i as u64 + 1) * 100;
            record.exists = true;
        }

        let page = state.holder_page(0, 2);
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].user, addr(10));
        assert_eq!(page[2].shares, 300);

        // Out-of-bounds end is clamped
        let page = state.holder_page(3, 100);
        assert_eq!(page.len(), 2);

        // Empty window
        assert!(state.holder_page(7, 9).is_empty());
    }

    #[test]
    fn test_state_serialization_round_trip() {
        let mut state = VaultState::new(addr(9), addr(1), addr(2));
        state.holder_mut(addr(3)).shares = 42;
        state.total_shares = 42;

        let bytes = borsh::to_vec(&state).unwrap();
        let restored: VaultState = borsh::from_slice(&bytes).unwrap();
        assert_eq!(state, restored);
    }
}
