//! rangevault Factory
//!
//! Process-wide vault registry: explicit creation, lookup and
//! enumeration of vault instances, and a versioned implementation
//! registry that makes upgrades an administrative operation on a
//! reference, never on in-flight vault state.
//!
//! Vault identities are deterministic: sha256 over the token pair,
//! the fee tier and the factory's creation index. Duplicate token
//! *pairs* are allowed (the index disambiguates); duplicate or zero
//! token identities within one pair are not.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use rangevault_common::{
    check,
    constants::limits::MAX_VAULT_PAGE,
    validation, Address, EventLog, VaultError, VaultEvent, VaultId, VaultResult, ZERO_ADDRESS,
};

/// Registry entry for one created vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultRecord {
    pub id: VaultId,
    /// Borrowed/pegged pool asset
    pub token0: Address,
    /// Deposit/quote asset
    pub token1: Address,
    /// Pool fee tier in hundredths of a bip (e.g. 3000 = 0.3%)
    pub fee_tier: u32,
    pub manager: Address,
    /// Active implementation reference
    pub implementation: Address,
    /// Creation index, also the id-derivation nonce
    pub index: u64,
}

/// Owner-gated vault registry with a versioned implementation table.
#[derive(Debug)]
pub struct VaultFactory {
    owner: Address,
    vaults: BTreeMap<VaultId, VaultRecord>,
    vault_index: Vec<VaultId>,
    /// implementation reference -> registered version
    implementations: BTreeMap<Address, u32>,
    created: u64,
    pub events: EventLog,
}

impl VaultFactory {
    pub fn new(owner: Address) -> VaultResult<Self> {
        check!(owner != ZERO_ADDRESS, VaultError::ZeroAddress);
        Ok(Self {
            owner,
            vaults: BTreeMap::new(),
            vault_index: Vec::new(),
            implementations: BTreeMap::new(),
            created: 0,
            events: EventLog::new(),
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    fn require_owner(&self, caller: Address) -> VaultResult<()> {
        validation::require_manager(caller == self.owner)
    }

    // ============ Implementation Registry ============

    /// Register (or re-version) an implementation reference.
    pub fn register_implementation(
        &mut self,
        caller: Address,
        implementation: Address,
        version: u32,
    ) -> VaultResult<()> {
        self.require_owner(caller)?;
        check!(implementation != ZERO_ADDRESS, VaultError::ZeroAddress);
        self.implementations.insert(implementation, version);
        Ok(())
    }

    pub fn implementation_version(&self, implementation: Address) -> Option<u32> {
        self.implementations.get(&implementation).copied()
    }

    fn require_registered(&self, implementation: Address) -> VaultResult<()> {
        check!(
            self.implementations.contains_key(&implementation),
            VaultError::ImplementationNotFound
        );
        Ok(())
    }

    // ============ Creation and Lookup ============

    /// Create a vault over `(token0, token1)` at `fee_tier` and
    /// record it under a fresh deterministic id.
    pub fn create_vault(
        &mut self,
        caller: Address,
        token0: Address,
        token1: Address,
        fee_tier: u32,
        manager: Address,
        implementation: Address,
    ) -> VaultResult<VaultId> {
        self.require_owner(caller)?;
        validation::require_valid_token_pair(token0, token1)?;
        check!(manager != ZERO_ADDRESS, VaultError::ZeroAddress);
        self.require_registered(implementation)?;

        let id = derive_vault_id(&token0, &token1, fee_tier, self.created);
        check!(!self.vaults.contains_key(&id), VaultError::VaultAlreadyExists);

        let record = VaultRecord {
            id,
            token0,
            token1,
            fee_tier,
            manager,
            implementation,
            index: self.created,
        };
        self.vaults.insert(id, record);
        self.vault_index.push(id);
        self.created += 1;

        self.events.emit(VaultEvent::VaultCreated { vault_id: id, manager });
        Ok(id)
    }

    pub fn get(&self, id: VaultId) -> VaultResult<&VaultRecord> {
        self.vaults.get(&id).ok_or(VaultError::VaultNotFound)
    }

    pub fn vault_count(&self) -> usize {
        self.vault_index.len()
    }

    /// Paginated id enumeration in creation order over the inclusive
    /// index range `[from, to]`, clamped to the index and to
    /// `MAX_VAULT_PAGE` entries.
    pub fn vault_ids(&self, from: usize, to: usize) -> Vec<VaultId> {
        let end = to.min(self.vault_index.len().saturating_sub(1));
        if self.vault_index.is_empty() || from > end {
            return Vec::new();
        }
        self.vault_index[from..=end]
            .iter()
            .take(MAX_VAULT_PAGE)
            .copied()
            .collect()
    }

    // ============ Upgrades ============

    /// Swap one vault's implementation reference. Vault state is
    /// untouched.
    pub fn upgrade_vault(
        &mut self,
        caller: Address,
        id: VaultId,
        implementation: Address,
    ) -> VaultResult<()> {
        self.require_owner(caller)?;
        self.require_registered(implementation)?;
        let record = self.vaults.get_mut(&id).ok_or(VaultError::VaultNotFound)?;
        record.implementation = implementation;
        self.events.emit(VaultEvent::VaultUpgraded { vault_id: id, implementation });
        Ok(())
    }

    /// Swap the implementation reference of many vaults at once.
    /// All-or-nothing: any unknown id fails the whole batch before
    /// the first write.
    pub fn upgrade_vaults(
        &mut self,
        caller: Address,
        ids: &[VaultId],
        implementation: Address,
    ) -> VaultResult<()> {
        self.require_owner(caller)?;
        self.require_registered(implementation)?;
        for id in ids {
            check!(self.vaults.contains_key(id), VaultError::VaultNotFound);
        }
        for id in ids {
            if let Some(record) = self.vaults.get_mut(id) {
                record.implementation = implementation;
                self.events
                    .emit(VaultEvent::VaultUpgraded { vault_id: *id, implementation });
            }
        }
        Ok(())
    }

    // ============ Ownership ============

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> VaultResult<()> {
        self.require_owner(caller)?;
        check!(new_owner != ZERO_ADDRESS, VaultError::ZeroAddress);
        let previous = self.owner;
        self.owner = new_owner;
        self.events
            .emit(VaultEvent::OwnershipTransferred { previous, new: new_owner });
        Ok(())
    }
}

/// Deterministic vault id: sha256 over the token pair, fee tier and
/// creation index.
pub fn derive_vault_id(token0: &Address, token1: &Address, fee_tier: u32, index: u64) -> VaultId {
    let mut hasher = Sha256::new();
    hasher.update(token0);
    hasher.update(token1);
    hasher.update(fee_tier.to_le_bytes());
    hasher.update(index.to_le_bytes());
    let digest = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&digest);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangevault_common::EventType;

    const OWNER: Address = [0x01; 32];
    const OTHER: Address = [0x02; 32];
    const IMPL_V1: Address = [0xA1; 32];
    const IMPL_V2: Address = [0xA2; 32];
    const TOKEN0: Address = [0x20; 32];
    const TOKEN1: Address = [0x21; 32];

    fn factory() -> VaultFactory {
        let mut factory = VaultFactory::new(OWNER).unwrap();
        factory.register_implementation(OWNER, IMPL_V1, 1).unwrap();
        factory
    }

    fn create(factory: &mut VaultFactory, fee_tier: u32) -> VaultId {
        factory
            .create_vault(OWNER, TOKEN0, TOKEN1, fee_tier, OWNER, IMPL_V1)
            .unwrap()
    }

    #[test]
    fn zero_owner_rejected() {
        assert!(matches!(
            VaultFactory::new(ZERO_ADDRESS),
            Err(VaultError::ZeroAddress)
        ));
    }

    #[test]
    fn create_is_owner_only() {
        let mut factory = factory();
        assert_eq!(
            factory.create_vault(OTHER, TOKEN0, TOKEN1, 3000, OWNER, IMPL_V1),
            Err(VaultError::ManagerOnly)
        );
    }

    #[test]
    fn create_rejects_bad_token_pairs() {
        let mut factory = factory();
        assert_eq!(
            factory.create_vault(OWNER, TOKEN0, TOKEN0, 3000, OWNER, IMPL_V1),
            Err(VaultError::InvalidTokenPair)
        );
        assert_eq!(
            factory.create_vault(OWNER, ZERO_ADDRESS, TOKEN1, 3000, OWNER, IMPL_V1),
            Err(VaultError::InvalidTokenPair)
        );
    }

    #[test]
    fn create_requires_registered_implementation() {
        let mut factory = factory();
        assert_eq!(
            factory.create_vault(OWNER, TOKEN0, TOKEN1, 3000, OWNER, IMPL_V2),
            Err(VaultError::ImplementationNotFound)
        );
    }

    #[test]
    fn create_records_and_emits() {
        let mut factory = factory();
        let id = create(&mut factory, 3000);

        let record = factory.get(id).unwrap();
        assert_eq!(record.token0, TOKEN0);
        assert_eq!(record.token1, TOKEN1);
        assert_eq!(record.fee_tier, 3000);
        assert_eq!(record.implementation, IMPL_V1);
        assert_eq!(factory.vault_count(), 1);
        assert_eq!(factory.events.filter_by_type(EventType::VaultCreated).len(), 1);
    }

    #[test]
    fn duplicate_pairs_get_distinct_ids() {
        let mut factory = factory();
        let first = create(&mut factory, 3000);
        let second = create(&mut factory, 3000);
        assert_ne!(first, second);
        assert_eq!(factory.vault_count(), 2);
    }

    #[test]
    fn ids_are_deterministic() {
        let mut factory = factory();
        let id = create(&mut factory, 3000);
        assert_eq!(id, derive_vault_id(&TOKEN0, &TOKEN1, 3000, 0));
    }

    #[test]
    fn lookup_of_unknown_id_fails() {
        let factory = factory();
        assert_eq!(factory.get([0xFF; 32]), Err(VaultError::VaultNotFound));
    }

    #[test]
    fn pagination_is_clamped() {
        let mut factory = factory();
        let ids: Vec<VaultId> = (0u32..5).map(|i| create(&mut factory, 500 * (i + 1))).collect();

        assert_eq!(factory.vault_ids(0, 2), &ids[0..=2]);
        assert_eq!(factory.vault_ids(3, 100), &ids[3..=4]);
        assert!(factory.vault_ids(7, 9).is_empty());
        assert!(VaultFactory::new(OWNER).unwrap().vault_ids(0, 0).is_empty());
    }

    #[test]
    fn upgrade_swaps_reference_only() {
        let mut factory = factory();
        let id = create(&mut factory, 3000);
        factory.register_implementation(OWNER, IMPL_V2, 2).unwrap();

        assert_eq!(
            factory.upgrade_vault(OTHER, id, IMPL_V2),
            Err(VaultError::ManagerOnly)
        );
        assert_eq!(
            factory.upgrade_vault(OWNER, id, [0xBB; 32]),
            Err(VaultError::ImplementationNotFound)
        );

        factory.upgrade_vault(OWNER, id, IMPL_V2).unwrap();
        let record = factory.get(id).unwrap();
        assert_eq!(record.implementation, IMPL_V2);
        // Everything else is untouched.
        assert_eq!(record.fee_tier, 3000);
        assert_eq!(factory.events.filter_by_type(EventType::VaultUpgraded).len(), 1);
    }

    #[test]
    fn batch_upgrade_is_all_or_nothing() {
        let mut factory = factory();
        let first = create(&mut factory, 3000);
        let second = create(&mut factory, 500);
        factory.register_implementation(OWNER, IMPL_V2, 2).unwrap();

        assert_eq!(
            factory.upgrade_vaults(OWNER, &[first, [0xFF; 32]], IMPL_V2),
            Err(VaultError::VaultNotFound)
        );
        assert_eq!(factory.get(first).unwrap().implementation, IMPL_V1);

        factory.upgrade_vaults(OWNER, &[first, second], IMPL_V2).unwrap();
        assert_eq!(factory.get(first).unwrap().implementation, IMPL_V2);
        assert_eq!(factory.get(second).unwrap().implementation, IMPL_V2);
    }

    #[test]
    fn ownership_transfer() {
        let mut factory = factory();
        assert_eq!(
            factory.transfer_ownership(OTHER, OTHER),
            Err(VaultError::ManagerOnly)
        );
        assert_eq!(
            factory.transfer_ownership(OWNER, ZERO_ADDRESS),
            Err(VaultError::ZeroAddress)
        );

        factory.transfer_ownership(OWNER, OTHER).unwrap();
        assert_eq!(factory.owner(), OTHER);
        // The previous owner is locked out, the new one is in.
        assert!(factory.register_implementation(OWNER, IMPL_V2, 2).is_err());
        assert!(factory.register_implementation(OTHER, IMPL_V2, 2).is_ok());
        assert!(factory
            .events
            .events()
            .contains(&VaultEvent::OwnershipTransferred { previous: OWNER, new: OTHER }));
    }

    // A created record carries everything needed to wire a live
    // vault over the core crate's collaborator seams.
    #[test]
    fn record_wires_a_working_vault() {
        use rangevault_core::testing::{MANAGER, USER2};

        let mut factory = factory();
        let id = factory
            .create_vault(OWNER, [0x20; 32], [0x21; 32], 3000, MANAGER, IMPL_V1)
            .unwrap();
        let record = *factory.get(id).unwrap();

        let mut vault = rangevault_core::testing::funded_vault();
        assert_eq!(vault.state.asset0, record.token0);
        assert_eq!(vault.state.asset1, record.token1);

        vault.mint(USER2, 1_000).unwrap();
        assert_eq!(vault.total_shares(), 1_000);
    }
}
