//! Position Manager
//!
//! The AMM position lifecycle: range selection, adding and removing
//! liquidity, idle-balance recomposition through swaps, and the
//! explicit trading-fee harvest. At most one position is open at a
//! time; repeat adds to the open range are additive.

use rangevault_common::{
    check, math::safe_add, validation::validate_ticks, Address, SwapDirection, TickRange,
    VaultError, VaultEvent, VaultResult,
};

use crate::external::{AccessGate, AmmPool, LendingMarket, SwapOutcome, TokenLedger};
use crate::vault::Vault;

impl<P, L, T, G> Vault<P, L, T, G>
where
    P: AmmPool,
    L: LendingMarket,
    T: TokenLedger,
    G: AccessGate,
{
    /// Overwrite the configured tick range. Does not touch the pool
    /// position itself.
    pub fn update_ticks(&mut self, caller: Address, lower: i32, upper: i32) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            validate_ticks(lower, upper, vault.pool.tick_spacing())?;

            vault.state.lower_tick = lower;
            vault.state.upper_tick = upper;
            vault.events.emit(VaultEvent::TicksSet { lower_tick: lower, upper_tick: upper });
            Ok(())
        })
    }

    /// Open (or add to) the pool position for the given range,
    /// consuming up to the given amounts from the idle balances.
    /// Leftover amounts the pool cannot use stay idle. Returns
    /// `(liquidity_delta, used0, used1)`.
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        lower: i32,
        upper: i32,
        amount0: u64,
        amount1: u64,
    ) -> VaultResult<(u64, u64, u64)> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            validate_ticks(lower, upper, vault.pool.tick_spacing())?;

            // One position at a time: adds to the open range are
            // additive, a different range must be closed first.
            if vault.state.in_position
                && (lower, upper) != (vault.state.lower_tick, vault.state.upper_tick)
            {
                return Err(VaultError::PositionAlreadyOpen {
                    lower: vault.state.lower_tick,
                    upper: vault.state.upper_tick,
                });
            }

            let (idle0, idle1) = vault.idle_balances();
            check!(
                amount0 <= idle0,
                VaultError::InsufficientBalance { available: idle0, requested: amount0 }
            );
            check!(
                amount1 <= idle1,
                VaultError::InsufficientBalance { available: idle1, requested: amount1 }
            );

            let range = TickRange::new(lower, upper);
            let vault_address = vault.state.address;
            let (liquidity, used0, used1) =
                vault.pool.add_liquidity(vault_address, range, amount0, amount1)?;

            let pool_address = vault.pool.address();
            let (asset0, asset1) = (vault.state.asset0, vault.state.asset1);
            if used0 > 0 {
                vault.tokens.transfer(asset0, vault_address, pool_address, used0)?;
            }
            if used1 > 0 {
                vault.tokens.transfer(asset1, vault_address, pool_address, used1)?;
            }

            vault.state.lower_tick = lower;
            vault.state.upper_tick = upper;
            if !vault.state.in_position {
                vault.state.in_position = true;
                vault.events.emit(VaultEvent::PositionStatusSet { in_position: true });
            }
            vault.events.emit(VaultEvent::LiquidityAdded {
                liquidity,
                lower_tick: lower,
                upper_tick: upper,
                amount0: used0,
                amount1: used1,
            });
            Ok((liquidity, used0, used1))
        })
    }

    /// Burn all liquidity at the configured range back into the idle
    /// balances. With zero liquidity this is a no-op for principal
    /// but still collects any owed trading fees. Harvested fees are
    /// routed through the fee engine before being credited idle.
    pub fn remove_liquidity(&mut self, caller: Address) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;

            let range = vault.range();
            let vault_address = vault.state.address;
            let pool_address = vault.pool.address();
            let (asset0, asset1) = (vault.state.asset0, vault.state.asset1);

            let position = vault.pool.position(vault_address, range);
            if position.liquidity > 0 {
                let removed = vault.pool.burn_all(vault_address, range)?;

                let out0 = safe_add(removed.burned0, removed.fee0)?;
                let out1 = safe_add(removed.burned1, removed.fee1)?;
                if out0 > 0 {
                    vault.tokens.transfer(asset0, pool_address, vault_address, out0)?;
                }
                if out1 > 0 {
                    vault.tokens.transfer(asset1, pool_address, vault_address, out1)?;
                }
                vault.state.fees.apply_performance(removed.fee0, removed.fee1)?;

                vault.events.emit(VaultEvent::LiquidityRemoved {
                    liquidity: removed.liquidity,
                    lower_tick: range.lower,
                    upper_tick: range.upper,
                    amount0: removed.burned0,
                    amount1: removed.burned1,
                });
                if removed.fee0 > 0 || removed.fee1 > 0 {
                    vault
                        .events
                        .emit(VaultEvent::FeesEarned { fee0: removed.fee0, fee1: removed.fee1 });
                }
            } else {
                let (fee0, fee1) = vault.pool.collect(vault_address, range)?;
                if fee0 > 0 {
                    vault.tokens.transfer(asset0, pool_address, vault_address, fee0)?;
                }
                if fee1 > 0 {
                    vault.tokens.transfer(asset1, pool_address, vault_address, fee1)?;
                }
                vault.state.fees.apply_performance(fee0, fee1)?;
                if fee0 > 0 || fee1 > 0 {
                    vault.events.emit(VaultEvent::FeesEarned { fee0, fee1 });
                }
            }

            vault.state.in_position = false;
            vault.events.emit(VaultEvent::PositionStatusSet { in_position: false });
            Ok(())
        })
    }

    /// Recompose the idle balances through the pool, bounded by
    /// `price_limit`. No share-ledger interaction; pool failures
    /// propagate unchanged.
    pub fn swap(
        &mut self,
        caller: Address,
        direction: SwapDirection,
        amount_in: u64,
        price_limit: u64,
    ) -> VaultResult<SwapOutcome> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;

            let (idle0, idle1) = vault.idle_balances();
            let available = match direction {
                SwapDirection::ZeroForOne => idle0,
                SwapDirection::OneForZero => idle1,
            };
            check!(
                amount_in <= available,
                VaultError::InsufficientBalance { available, requested: amount_in }
            );

            let vault_address = vault.state.address;
            let outcome = vault.pool.swap(vault_address, direction, amount_in, price_limit)?;

            let pool_address = vault.pool.address();
            let (asset_in, asset_out) = match direction {
                SwapDirection::ZeroForOne => (vault.state.asset0, vault.state.asset1),
                SwapDirection::OneForZero => (vault.state.asset1, vault.state.asset0),
            };
            vault.tokens.transfer(asset_in, vault_address, pool_address, outcome.amount_in)?;
            vault.tokens.transfer(asset_out, pool_address, vault_address, outcome.amount_out)?;

            vault.events.emit(VaultEvent::Swapped {
                zero_for_one: direction == SwapDirection::ZeroForOne,
                amount_in: outcome.amount_in,
                amount_out: outcome.amount_out,
            });
            Ok(outcome)
        })
    }

    /// Explicitly harvest owed trading fees without touching the
    /// position's liquidity. The performance fee accrues here, at
    /// harvest time. Returns the gross `(fee0, fee1)` collected.
    pub fn pull_fee_from_pool(&mut self, caller: Address) -> VaultResult<(u64, u64)> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;

            let range = vault.range();
            let vault_address = vault.state.address;
            let (fee0, fee1) = vault.pool.collect(vault_address, range)?;

            let pool_address = vault.pool.address();
            if fee0 > 0 {
                vault.tokens.transfer(vault.state.asset0, pool_address, vault_address, fee0)?;
            }
            if fee1 > 0 {
                vault.tokens.transfer(vault.state.asset1, pool_address, vault_address, fee1)?;
            }
            vault.state.fees.apply_performance(fee0, fee1)?;

            if fee0 > 0 || fee1 > 0 {
                vault.events.emit(VaultEvent::FeesEarned { fee0, fee1 });
            }
            Ok((fee0, fee1))
        })
    }
}
