//! Share Ledger
//!
//! Proportional ownership accounting: mint on deposit, burn on
//! withdrawal, transfer between holders. The valuator snapshot is
//! taken strictly before any balance mutation in the same operation;
//! reversing that order would let a depositor mint against a
//! self-inflated denominator.

use rangevault_common::{
    check, proportional_move, safe_add, safe_sub, shares_for_deposit, underlying_for_shares,
    validation, Address, VaultError, VaultEvent, VaultResult,
};

use crate::external::{AccessGate, AmmPool, LendingMarket, TokenLedger};
use crate::vault::Vault;

impl<P, L, T, G> Vault<P, L, T, G>
where
    P: AmmPool,
    L: LendingMarket,
    T: TokenLedger,
    G: AccessGate,
{
    /// Deposit `amount` of asset1 and mint proportional shares.
    ///
    /// Bootstrap rule: the first depositor gets shares 1:1. Returns
    /// the shares minted.
    pub fn mint(&mut self, caller: Address, amount: u64) -> VaultResult<u64> {
        self.guarded(|vault| {
            vault.require_active()?;
            validation::require_positive(amount)?;

            let total = vault.state.total_shares;
            // Snapshot before the deposit lands in the idle balance.
            let underlying_before = if total == 0 { 0 } else { vault.underlying_balance()? };
            let shares = shares_for_deposit(amount, total, underlying_before)?;
            check!(shares > 0, VaultError::InvalidCollateralAmount);

            // Precompute every new value so arithmetic failures
            // cannot leave a partial write behind.
            let record = vault.user_vault_data(caller);
            let new_shares = safe_add(record.shares, shares)?;
            let new_token = safe_add(record.token, amount)?;
            let new_total = safe_add(total, shares)?;

            let vault_address = vault.state.address;
            let asset1 = vault.state.asset1;
            vault.tokens.transfer(asset1, caller, vault_address, amount)?;

            let record = vault.state.holder_mut(caller);
            record.shares = new_shares;
            record.token = new_token;
            record.exists = true;
            vault.state.total_shares = new_total;

            vault.events.emit(VaultEvent::Minted { receiver: caller, shares, amount });
            Ok(shares)
        })
    }

    /// Burn `shares` and pay out the proportional underlying amount
    /// in asset1, net of the managing fee. Returns the net amount
    /// paid to the holder.
    pub fn burn(&mut self, caller: Address, shares: u64) -> VaultResult<u64> {
        self.guarded(|vault| {
            vault.require_active()?;

            let record = vault.user_vault_data(caller);
            validation::require_sufficient_shares(record.shares, shares)?;
            if shares == 0 {
                return Ok(0);
            }

            let total = vault.state.total_shares;
            // Snapshot before the burn mutates anything.
            let underlying_before = vault.underlying_balance()?;
            let amount = underlying_for_shares(shares, underlying_before, total)?;

            let token_moved = proportional_move(record.token, record.shares, shares)?;
            let new_shares = safe_sub(record.shares, shares)?;
            let new_token = safe_sub(record.token, token_moved)?;
            let new_total = safe_sub(total, shares)?;
            // First mutation: the fee engine accrues the managing
            // fee and returns the net payout, before the transfer
            // and the ledger writes.
            let (net, fee) = vault.state.fees.apply_managing(amount)?;

            let vault_address = vault.state.address;
            let asset1 = vault.state.asset1;
            vault.tokens.transfer(asset1, vault_address, caller, net)?;

            let record = vault.state.holder_mut(caller);
            record.shares = new_shares;
            record.token = new_token;
            if record.shares == 0 {
                record.exists = false;
            }
            vault.state.total_shares = new_total;

            vault.events.emit(VaultEvent::Burned { receiver: caller, shares, amount, fee });
            Ok(net)
        })
    }

    /// Move `shares` from one holder to another, together with the
    /// proportional slice of the sender's underlying bookkeeping.
    /// Total shares are unchanged.
    pub fn transfer_shares(&mut self, from: Address, to: Address, shares: u64) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_active()?;
            check!(to != rangevault_common::ZERO_ADDRESS, VaultError::ZeroAddress);

            let sender = vault.user_vault_data(from);
            validation::require_sufficient_shares(sender.shares, shares)?;
            if shares == 0 || from == to {
                return Ok(());
            }

            let token_moved = proportional_move(sender.token, sender.shares, shares)?;
            let sender_shares = safe_sub(sender.shares, shares)?;
            let sender_token = safe_sub(sender.token, token_moved)?;
            let receiver = vault.user_vault_data(to);
            let receiver_shares = safe_add(receiver.shares, shares)?;
            let receiver_token = safe_add(receiver.token, token_moved)?;

            let record = vault.state.holder_mut(from);
            record.shares = sender_shares;
            record.token = sender_token;
            if record.shares == 0 {
                record.exists = false;
            }

            let record = vault.state.holder_mut(to);
            record.shares = receiver_shares;
            record.token = receiver_token;
            record.exists = true;

            vault
                .events
                .emit(VaultEvent::SharesTransferred { from, to, shares, token_moved });
            Ok(())
        })
    }
}
