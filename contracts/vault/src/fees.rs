//! Fee Administration
//!
//! Manager-facing fee controls: overwriting the fee rates, paying out
//! accrued manager balances, and the mint/burn pause switch. Fee
//! accrual itself lives with the operations that produce it: the
//! managing fee in [`burn`](Vault::burn), the performance fee at
//! harvest time in the position manager.

use rangevault_common::{Address, VaultEvent, VaultResult};

use crate::external::{AccessGate, AmmPool, LendingMarket, TokenLedger};
use crate::vault::Vault;

impl<P, L, T, G> Vault<P, L, T, G>
where
    P: AmmPool,
    L: LendingMarket,
    T: TokenLedger,
    G: AccessGate,
{
    /// Overwrite both fee rates. Caps: managing 100 bps, performance
    /// 10_000 bps. Already-accrued manager balances are unaffected.
    pub fn update_fees(
        &mut self,
        caller: Address,
        managing_bps: u16,
        performance_bps: u16,
    ) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            vault.state.fees.update(managing_bps, performance_bps)?;
            vault.events.emit(VaultEvent::FeesUpdated {
                managing_fee_bps: managing_bps,
                performance_fee_bps: performance_bps,
            });
            Ok(())
        })
    }

    /// Pay out the accrued manager balances to the caller and reset
    /// them to zero. Returns `(amount0, amount1)` paid.
    pub fn collect_manager(&mut self, caller: Address) -> VaultResult<(u64, u64)> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;

            let (amount0, amount1) = vault.state.fees.collect();
            let vault_address = vault.state.address;
            if amount0 > 0 {
                vault.tokens.transfer(vault.state.asset0, vault_address, caller, amount0)?;
            }
            if amount1 > 0 {
                vault.tokens.transfer(vault.state.asset1, vault_address, caller, amount1)?;
            }

            if amount0 > 0 || amount1 > 0 {
                vault.events.emit(VaultEvent::ManagerCollected { amount0, amount1 });
            }
            Ok((amount0, amount1))
        })
    }

    /// Disable mint, burn and share transfers. Manager operations
    /// stay available while paused.
    pub fn pause(&mut self, caller: Address) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            vault.gate.set_paused(true);
            vault.events.emit(VaultEvent::Paused { by: caller });
            Ok(())
        })
    }

    /// Re-enable mint, burn and share transfers.
    pub fn unpause(&mut self, caller: Address) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            vault.gate.set_paused(false);
            vault.events.emit(VaultEvent::Unpaused { by: caller });
            Ok(())
        })
    }
}
