//! Test Collaborators
//!
//! In-memory implementations of the four external seams, plus the
//! vault fixtures the unit and integration tests share. The mocks
//! model the accounting contracts of their real counterparts (pull
//! semantics, LTV and health-factor gating, balance-checked
//! transfers) without any tick or interest-rate math: the pool
//! prices everything at its fixed current price.

use std::collections::BTreeMap;

use rangevault_common::{
    constants::precision::PRICE_ONE,
    Address, LendingPositionData, SwapDirection, TickRange, VaultError, VaultResult,
};

use crate::external::{
    AccessGate, AmmPool, LendingMarket, PoolPosition, RemovedLiquidity, SwapOutcome, TokenLedger,
};
use crate::vault::Vault;

pub const MANAGER: Address = [0x01; 32];
pub const USER2: Address = [0x02; 32];
pub const NON_MANAGER: Address = [0x03; 32];

pub const VAULT_ADDR: Address = [0x10; 32];
pub const POOL_ADDR: Address = [0x11; 32];
pub const MARKET_ADDR: Address = [0x12; 32];

/// Borrowed/pegged pool asset
pub const ASSET0: Address = [0x20; 32];
/// Deposit/quote asset
pub const ASSET1: Address = [0x21; 32];

const FUNDING: u64 = 100_000_000_000;
const POOL_RESERVE: u64 = 1_000_000_000_000;

pub type TestVault = Vault<MockPool, MockLendingMarket, MockLedger, StaticGate>;

// ============ Token Ledger ============

/// Balance map keyed by `(asset, owner)`.
#[derive(Debug, Default)]
pub struct MockLedger {
    balances: BTreeMap<(Address, Address), u64>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infallible balance bump, for fixtures and fee accrual.
    pub fn credit(&mut self, asset: Address, owner: Address, amount: u64) {
        let entry = self.balances.entry((asset, owner)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    pub fn balance_of(&self, asset: Address, owner: Address) -> u64 {
        self.balances.get(&(asset, owner)).copied().unwrap_or(0)
    }
}

impl TokenLedger for MockLedger {
    fn balance_of(&self, asset: Address, owner: Address) -> u64 {
        MockLedger::balance_of(self, asset, owner)
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> VaultResult<()> {
        let available = MockLedger::balance_of(self, asset, from);
        if amount > available {
            return Err(VaultError::InsufficientBalance { available, requested: amount });
        }
        *self.balances.entry((asset, from)).or_insert(0) -= amount;
        self.credit(asset, to, amount);
        Ok(())
    }

    fn mint(&mut self, asset: Address, to: Address, amount: u64) -> VaultResult<()> {
        self.credit(asset, to, amount);
        Ok(())
    }

    fn burn(&mut self, asset: Address, from: Address, amount: u64) -> VaultResult<()> {
        let available = MockLedger::balance_of(self, asset, from);
        if amount > available {
            return Err(VaultError::InsufficientBalance { available, requested: amount });
        }
        *self.balances.entry((asset, from)).or_insert(0) -= amount;
        Ok(())
    }
}

// ============ AMM Pool ============

#[derive(Debug, Clone, Copy)]
struct MockPosition {
    owner: Address,
    range: TickRange,
    liquidity: u64,
    amount0: u64,
    amount1: u64,
    owed0: u64,
    owed1: u64,
}

/// Single-position pool that prices everything at a fixed current
/// price. Liquidity is the quote value of the deposited amounts;
/// swaps fill fully at the current price unless blocked.
#[derive(Debug)]
pub struct MockPool {
    price: u64,
    tick_spacing: i32,
    limit_blocked: bool,
    fill_bps: u64,
    position: Option<MockPosition>,
}

impl MockPool {
    pub fn new() -> Self {
        Self {
            price: PRICE_ONE,
            tick_spacing: 60,
            limit_blocked: false,
            fill_bps: 10_000,
            position: None,
        }
    }

    /// Fraction of requested amounts the pool actually consumes on
    /// `add_liquidity`, in BPS. Full fill by default.
    pub fn set_fill_bps(&mut self, fill_bps: u64) {
        self.fill_bps = fill_bps;
    }

    /// Make the next swap fail with `PriceLimitReached`.
    pub fn set_limit_blocked(&mut self, blocked: bool) {
        self.limit_blocked = blocked;
    }

    pub fn set_price(&mut self, price: u64) {
        self.price = price;
    }

    /// Accrue trading fees to `owner`'s position and put the
    /// corresponding units on the pool's ledger balance so they are
    /// collectable.
    pub fn credit_fees(&mut self, owner: Address, fee0: u64, fee1: u64, ledger: &mut MockLedger) {
        if let Some(position) = self.position.as_mut() {
            if position.owner == owner {
                position.owed0 = position.owed0.saturating_add(fee0);
                position.owed1 = position.owed1.saturating_add(fee1);
                ledger.credit(ASSET0, POOL_ADDR, fee0);
                ledger.credit(ASSET1, POOL_ADDR, fee1);
            }
        }
    }

    fn quote_value(&self, amount0: u64, amount1: u64) -> u64 {
        let value0 = amount0 as u128 * self.price as u128 / PRICE_ONE as u128;
        (value0 + amount1 as u128) as u64
    }
}

impl Default for MockPool {
    fn default() -> Self {
        Self::new()
    }
}

impl AmmPool for MockPool {
    fn address(&self) -> Address {
        POOL_ADDR
    }

    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn current_price(&self) -> u64 {
        self.price
    }

    fn add_liquidity(
        &mut self,
        owner: Address,
        range: TickRange,
        amount0: u64,
        amount1: u64,
    ) -> VaultResult<(u64, u64, u64)> {
        let used0 = (amount0 as u128 * self.fill_bps as u128 / 10_000) as u64;
        let used1 = (amount1 as u128 * self.fill_bps as u128 / 10_000) as u64;
        let delta = self.quote_value(used0, used1);
        match self.position.as_mut() {
            Some(position) if position.owner == owner && position.range == range => {
                position.liquidity = position.liquidity.saturating_add(delta);
                position.amount0 = position.amount0.saturating_add(used0);
                position.amount1 = position.amount1.saturating_add(used1);
            }
            Some(_) => return Err(VaultError::TransferFailed),
            None => {
                self.position = Some(MockPosition {
                    owner,
                    range,
                    liquidity: delta,
                    amount0: used0,
                    amount1: used1,
                    owed0: 0,
                    owed1: 0,
                });
            }
        }
        Ok((delta, used0, used1))
    }

    fn position(&self, owner: Address, range: TickRange) -> PoolPosition {
        match self.position {
            Some(p) if p.owner == owner && p.range == range => PoolPosition {
                liquidity: p.liquidity,
                tokens_owed0: p.owed0,
                tokens_owed1: p.owed1,
            },
            _ => PoolPosition::default(),
        }
    }

    fn amounts_for_liquidity(&self, range: TickRange, liquidity: u64) -> (u64, u64) {
        match self.position {
            Some(p) if p.range == range && liquidity > 0 => (p.amount0, p.amount1),
            _ => (0, 0),
        }
    }

    fn burn_all(&mut self, owner: Address, range: TickRange) -> VaultResult<RemovedLiquidity> {
        match self.position {
            Some(p) if p.owner == owner && p.range == range => {
                self.position = None;
                Ok(RemovedLiquidity {
                    liquidity: p.liquidity,
                    burned0: p.amount0,
                    burned1: p.amount1,
                    fee0: p.owed0,
                    fee1: p.owed1,
                })
            }
            _ => Ok(RemovedLiquidity::default()),
        }
    }

    fn collect(&mut self, owner: Address, range: TickRange) -> VaultResult<(u64, u64)> {
        match self.position.as_mut() {
            Some(p) if p.owner == owner && p.range == range => {
                let owed = (p.owed0, p.owed1);
                p.owed0 = 0;
                p.owed1 = 0;
                Ok(owed)
            }
            _ => Ok((0, 0)),
        }
    }

    fn swap(
        &mut self,
        _owner: Address,
        direction: SwapDirection,
        amount_in: u64,
        _price_limit: u64,
    ) -> VaultResult<SwapOutcome> {
        if self.limit_blocked {
            return Err(VaultError::PriceLimitReached);
        }
        let amount_out = match direction {
            SwapDirection::ZeroForOne => {
                (amount_in as u128 * self.price as u128 / PRICE_ONE as u128) as u64
            }
            SwapDirection::OneForZero => {
                (amount_in as u128 * PRICE_ONE as u128 / self.price as u128) as u64
            }
        };
        Ok(SwapOutcome { amount_in, amount_out })
    }
}

// ============ Lending Market ============

/// Single-account market with fixed LTV and liquidation-threshold
/// parameters, pricing debt at the same fixed price as the pool.
#[derive(Debug)]
pub struct MockLendingMarket {
    price: u64,
    ltv_bps: u64,
    liquidation_threshold_bps: u64,
    supplied: u64,
    debt: u64,
}

impl MockLendingMarket {
    pub fn new() -> Self {
        Self {
            price: PRICE_ONE,
            ltv_bps: 5_000,
            liquidation_threshold_bps: 8_000,
            supplied: 0,
            debt: 0,
        }
    }

    pub fn set_price(&mut self, price: u64) {
        self.price = price;
    }

    pub fn supplied(&self, _owner: Address) -> u64 {
        self.supplied
    }

    pub fn debt(&self, _owner: Address) -> u64 {
        self.debt
    }

    /// Outstanding debt valued in quote units.
    fn debt_value(&self, debt: u64) -> u64 {
        (debt as u128 * self.price as u128 / PRICE_ONE as u128) as u64
    }

    fn borrow_power(&self) -> u64 {
        (self.supplied as u128 * self.ltv_bps as u128 / 10_000) as u64
    }

    /// Collateral that must remain to keep the position at the
    /// liquidation threshold.
    fn required_collateral(&self) -> u64 {
        (self.debt_value(self.debt) as u128)
            .saturating_mul(10_000)
            .div_ceil(self.liquidation_threshold_bps as u128) as u64
    }
}

impl Default for MockLendingMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl LendingMarket for MockLendingMarket {
    fn address(&self) -> Address {
        MARKET_ADDR
    }

    fn supply(&mut self, _owner: Address, amount: u64) -> VaultResult<()> {
        self.supplied = self.supplied.saturating_add(amount);
        Ok(())
    }

    fn withdraw(&mut self, owner: Address, amount: u64) -> VaultResult<u64> {
        if amount > self.max_withdrawable(owner) {
            return Err(VaultError::HealthFactorBreach);
        }
        self.supplied -= amount;
        Ok(amount)
    }

    fn borrow(&mut self, _owner: Address, amount: u64) -> VaultResult<()> {
        let requested = self.debt_value(self.debt.saturating_add(amount));
        let available = self.borrow_power();
        if requested > available {
            return Err(VaultError::InsufficientBorrowPower { requested, available });
        }
        self.debt += amount;
        Ok(())
    }

    fn repay(&mut self, _owner: Address, amount: u64) -> VaultResult<u64> {
        let applied = amount.min(self.debt);
        self.debt -= applied;
        Ok(applied)
    }

    fn supplied(&self, owner: Address) -> u64 {
        MockLendingMarket::supplied(self, owner)
    }

    fn debt(&self, owner: Address) -> u64 {
        MockLendingMarket::debt(self, owner)
    }

    fn max_withdrawable(&self, _owner: Address) -> u64 {
        self.supplied.saturating_sub(self.required_collateral())
    }

    fn account_data(&self, _owner: Address) -> LendingPositionData {
        let debt_value = self.debt_value(self.debt);
        let health_factor = if debt_value == 0 {
            u64::MAX
        } else {
            (self.supplied as u128 * self.liquidation_threshold_bps as u128 / 10_000
                * PRICE_ONE as u128
                / debt_value as u128) as u64
        };
        LendingPositionData {
            collateral: self.supplied,
            debt: debt_value,
            available_to_borrow: self.borrow_power().saturating_sub(debt_value),
            liquidation_threshold: self.liquidation_threshold_bps,
            loan_to_value: self.ltv_bps,
            health_factor,
        }
    }
}

// ============ Access Gate ============

#[derive(Debug)]
pub struct StaticGate {
    manager: Address,
    paused: bool,
}

impl StaticGate {
    pub fn new(manager: Address) -> Self {
        Self { manager, paused: false }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

impl AccessGate for StaticGate {
    fn is_manager(&self, caller: Address) -> bool {
        caller == self.manager
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        StaticGate::set_paused(self, paused);
    }
}

// ============ Fixtures ============

/// An empty vault: no funding, no position, MANAGER authorized.
pub fn test_vault() -> TestVault {
    match Vault::new(
        VAULT_ADDR,
        ASSET0,
        ASSET1,
        MockPool::new(),
        MockLendingMarket::new(),
        MockLedger::new(),
        StaticGate::new(MANAGER),
    ) {
        Ok(vault) => vault,
        Err(_) => unreachable!("fixture addresses are valid"),
    }
}

/// A vault whose depositors are funded with the quote asset and
/// whose pool carries deep reserves for swaps.
pub fn funded_vault() -> TestVault {
    let mut vault = test_vault();
    vault.tokens.credit(ASSET1, MANAGER, FUNDING);
    vault.tokens.credit(ASSET1, USER2, FUNDING);
    vault.tokens.credit(ASSET0, POOL_ADDR, POOL_RESERVE);
    vault.tokens.credit(ASSET1, POOL_ADDR, POOL_RESERVE);
    vault
}
