//! Vault Orchestrator
//!
//! `Vault` wires the owned [`VaultState`] to the four external
//! collaborator handles and exposes the operation surface. The
//! stateless logic lives in `rangevault-common`; this type owns the
//! state, sequences the external reads and calls, and applies the
//! resulting deltas atomically.

use rangevault_common::{
    fee_amount, underlying_balance, validation, Address, EventLog, FeeData, HolderRecord,
    LendingPositionData, PoolData, TickRange, UnderlyingComponents, UserVaultView, VaultError,
    VaultResult, Vec,
};

use crate::external::{AccessGate, AmmPool, LendingMarket, TokenLedger};
use crate::state::VaultState;

/// A pooled concentrated-liquidity vault with a borrow leg.
///
/// Single writer: all mutation of `state` goes through the operation
/// methods, each of which runs under the reentrancy guard and either
/// commits in full or fails before mutating.
pub struct Vault<P, L, T, G> {
    pub state: VaultState,
    pub pool: P,
    pub lending: L,
    pub tokens: T,
    pub gate: G,
    pub events: EventLog,
}

impl<P, L, T, G> Vault<P, L, T, G>
where
    P: AmmPool,
    L: LendingMarket,
    T: TokenLedger,
    G: AccessGate,
{
    /// Wire a vault to its collaborators.
    ///
    /// `address` is the vault's own ledger identity; `asset0` is the
    /// borrowed/pegged pool asset and `asset1` the deposit asset.
    pub fn new(
        address: Address,
        asset0: Address,
        asset1: Address,
        pool: P,
        lending: L,
        tokens: T,
        gate: G,
    ) -> VaultResult<Self> {
        validation::require_valid_token_pair(asset0, asset1)?;
        if address == rangevault_common::ZERO_ADDRESS {
            return Err(VaultError::ZeroAddress);
        }
        Ok(Self {
            state: VaultState::new(address, asset0, asset1),
            pool,
            lending,
            tokens,
            gate,
            events: EventLog::new(),
        })
    }

    // ============ Operation Prologue ============

    /// Run `f` under the in-flight-operation flag. Nested entry is
    /// rejected before any state is touched.
    pub(crate) fn guarded<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> VaultResult<R>,
    ) -> VaultResult<R> {
        if self.state.entered {
            return Err(VaultError::ReentrantCall);
        }
        self.state.entered = true;
        let result = f(self);
        self.state.entered = false;
        result
    }

    pub(crate) fn require_manager(&self, caller: Address) -> VaultResult<()> {
        validation::require_manager(self.gate.is_manager(caller))
    }

    pub(crate) fn require_active(&self) -> VaultResult<()> {
        validation::require_not_paused(self.gate.is_paused())
    }

    pub(crate) fn range(&self) -> TickRange {
        TickRange::new(self.state.lower_tick, self.state.upper_tick)
    }

    // ============ Read-only Views ============

    /// The vault's pool-facing state.
    pub fn pool_data(&self) -> PoolData {
        PoolData {
            lower_tick: self.state.lower_tick,
            upper_tick: self.state.upper_tick,
            in_position: self.state.in_position,
        }
    }

    /// Fee rates and accrued manager balances.
    pub fn fee_data(&self) -> FeeData {
        self.state.fees.data()
    }

    /// A holder's ledger record; zeroed default if never created.
    pub fn user_vault_data(&self, user: Address) -> HolderRecord {
        self.state.holder(user).copied().unwrap_or_default()
    }

    /// Paginated holder enumeration over `[from, to]` inclusive.
    pub fn user_vaults(&self, from: usize, to: usize) -> Vec<UserVaultView> {
        self.state.holder_page(from, to)
    }

    /// Number of holders that ever minted or received shares.
    pub fn user_count(&self) -> usize {
        self.state.holder_count()
    }

    /// A holder's share balance.
    pub fn balance_of(&self, user: Address) -> u64 {
        self.user_vault_data(user).shares
    }

    /// Total ownership shares outstanding.
    pub fn total_shares(&self) -> u64 {
        self.state.total_shares
    }

    /// Live lending-market account view.
    pub fn lending_position(&self) -> LendingPositionData {
        self.lending.account_data(self.state.address)
    }

    /// Uncollected trading fees owed to the open position.
    pub fn current_fees(&self) -> (u64, u64) {
        let position = self.pool.position(self.state.address, self.range());
        (position.tokens_owed0, position.tokens_owed1)
    }

    /// Idle balances held directly by the vault, net of accrued
    /// manager balances (those are owed to the manager, not to
    /// holders).
    pub fn idle_balances(&self) -> (u64, u64) {
        let raw0 = self.tokens.balance_of(self.state.asset0, self.state.address);
        let raw1 = self.tokens.balance_of(self.state.asset1, self.state.address);
        (
            raw0.saturating_sub(self.state.fees.manager_balance0),
            raw1.saturating_sub(self.state.fees.manager_balance1),
        )
    }

    // ============ Underlying Valuator ============

    /// Total vault value in asset1 base units: idle balances, the
    /// open position's principal plus uncollected fees net of the
    /// pending performance cut, and supplied collateral minus
    /// outstanding debt, all converted at the pool's current price.
    ///
    /// Pure read over three live external sources; mint and burn
    /// call it strictly before mutating any balance.
    pub fn underlying_balance(&self) -> VaultResult<u64> {
        let (idle0, idle1) = self.idle_balances();

        let (position0, position1, fee0, fee1) = if self.state.in_position {
            let position = self.pool.position(self.state.address, self.range());
            let (p0, p1) = self.pool.amounts_for_liquidity(self.range(), position.liquidity);
            // Owed fees are valued net of the performance cut the
            // manager will take at harvest.
            let perf = self.state.fees.performance_fee_bps;
            let net0 = position.tokens_owed0 - fee_amount(position.tokens_owed0, perf)?;
            let net1 = position.tokens_owed1 - fee_amount(position.tokens_owed1, perf)?;
            (p0, p1, net0, net1)
        } else {
            (0, 0, 0, 0)
        };

        let account = self.lending.account_data(self.state.address);

        let components = UnderlyingComponents {
            idle0,
            idle1,
            position0,
            position1,
            fee0,
            fee1,
            collateral: account.collateral,
            debt: account.debt,
        };
        underlying_balance(&components, self.pool.current_price())
    }
}
