//! Mathematical Utilities for the rangevault Protocol
//!
//! Safe arithmetic and the share/fee/valuation formulas. All products
//! widen to `u128`; `mul_div` is the single rounding primitive and
//! truncates toward zero, which is the direction that never credits a
//! holder with value the vault does not hold.

use crate::constants::{fees, precision};
use crate::errors::{VaultError, VaultResult};

/// Computes `a * b / denom` with widening and a zero-denominator check.
pub fn mul_div(a: u64, b: u64, denom: u64) -> VaultResult<u64> {
    if denom == 0 {
        return Err(VaultError::DivisionByZero);
    }
    let result = (a as u128)
        .checked_mul(b as u128)
        .ok_or(VaultError::Overflow)?
        / denom as u128;
    if result > u64::MAX as u128 {
        return Err(VaultError::Overflow);
    }
    Ok(result as u64)
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> VaultResult<u64> {
    a.checked_add(b).ok_or(VaultError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u64, b: u64) -> VaultResult<u64> {
    a.checked_sub(b).ok_or(VaultError::Underflow)
}

// ============ Share Math ============

/// Shares minted for a deposit.
///
/// Bootstrap rule: with zero total shares the first depositor gets
/// shares 1:1 with the deposited amount. Afterwards
/// `shares = amount * total_shares / underlying_before`, where
/// `underlying_before` is the vault's total value measured strictly
/// before the deposit lands in the idle balance.
pub fn shares_for_deposit(
    amount: u64,
    total_shares: u64,
    underlying_before: u64,
) -> VaultResult<u64> {
    if total_shares == 0 {
        return Ok(amount);
    }
    mul_div(amount, total_shares, underlying_before)
}

/// Underlying amount owed for burning `shares`, measured against the
/// pre-burn valuator snapshot.
pub fn underlying_for_shares(
    shares: u64,
    underlying_before: u64,
    total_shares: u64,
) -> VaultResult<u64> {
    mul_div(shares, underlying_before, total_shares)
}

/// Bookkeeping amount that moves with a share transfer or burn.
///
/// `token - token * (balance - transferred) / balance`: the holder
/// keeps the truncated remainder, so the moved amount absorbs the
/// rounding dust and per-holder claims still sum to the total.
pub fn proportional_move(token: u64, balance: u64, transferred: u64) -> VaultResult<u64> {
    if transferred > balance {
        return Err(VaultError::InsufficientShares {
            available: balance,
            requested: transferred,
        });
    }
    if balance == 0 {
        return Ok(0);
    }
    let kept = mul_div(token, balance - transferred, balance)?;
    safe_sub(token, kept)
}

// ============ Fee Math ============

/// Fee taken from `amount` at `bps` basis points, truncating.
pub fn fee_amount(amount: u64, bps: u16) -> VaultResult<u64> {
    mul_div(amount, bps as u64, fees::BPS_DENOMINATOR)
}

// ============ Valuation Math ============

/// Value of an asset0 amount in asset1 base units at `price`
/// (asset1 per asset0, scaled by `precision::PRICE_ONE`).
pub fn value_in_quote(amount0: u64, price: u64) -> VaultResult<u64> {
    mul_div(amount0, price, precision::PRICE_ONE)
}

/// Asset0 amount obtainable for a quote value at `price`.
pub fn base_for_quote(value1: u64, price: u64) -> VaultResult<u64> {
    mul_div(value1, precision::PRICE_ONE, price)
}

/// Inputs to the underlying valuator, gathered by the orchestrator
/// from its three live sources: the token ledger, the AMM pool and
/// the lending market.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnderlyingComponents {
    /// Idle asset0 held directly by the vault
    pub idle0: u64,
    /// Idle asset1 held directly by the vault
    pub idle1: u64,
    /// Position principal in asset0 at the current price
    pub position0: u64,
    /// Position principal in asset1 at the current price
    pub position1: u64,
    /// Uncollected trading fees in asset0
    pub fee0: u64,
    /// Uncollected trading fees in asset1
    pub fee1: u64,
    /// Supplied collateral value (asset1 units)
    pub collateral: u64,
    /// Outstanding debt value (asset1 units)
    pub debt: u64,
}

/// Total vault value in asset1 base units: idle balances, position
/// principal plus uncollected fees at the current price, and net
/// collateral minus debt. Fails with `Underflow` only if debt
/// exceeds everything else combined.
pub fn underlying_balance(c: &UnderlyingComponents, price: u64) -> VaultResult<u64> {
    let side0 = safe_add(safe_add(c.idle0, c.position0)?, c.fee0)?;
    let side0_value = value_in_quote(side0, price)?;

    let side1 = safe_add(safe_add(c.idle1, c.position1)?, c.fee1)?;

    let gross = (side0_value as u128) + (side1 as u128) + (c.collateral as u128);
    let net = gross.checked_sub(c.debt as u128).ok_or(VaultError::Underflow)?;
    if net > u64::MAX as u128 {
        return Err(VaultError::Overflow);
    }
    Ok(net as u64)
}
