//! Collateral and Debt Leg
//!
//! Manager-only operations against the lending market: supplying and
//! withdrawing asset1 collateral, and minting and repaying asset0
//! debt. The pegged borrowed asset is created on borrow and destroyed
//! on repay. `Amount::All` resolves against the live market position
//! at execution time.

use rangevault_common::{
    check,
    validation::require_positive,
    Address, Amount, VaultError, VaultEvent, VaultResult,
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
    /// Move `amount` of idle asset1 into the lending market as
    /// collateral.
    pub fn supply_collateral(&mut self, caller: Address, amount: u64) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            require_positive(amount)?;

            let (_, idle1) = vault.idle_balances();
            check!(
                amount <= idle1,
                VaultError::InsufficientBalance { available: idle1, requested: amount }
            );

            let vault_address = vault.state.address;
            vault.lending.supply(vault_address, amount)?;
            vault
                .tokens
                .transfer(vault.state.asset1, vault_address, vault.lending.address(), amount)?;

            vault.events.emit(VaultEvent::CollateralSupplied { amount });
            Ok(())
        })
    }

    /// Release collateral back into the idle balances. `Amount::All`
    /// resolves to the largest withdrawal the market permits without
    /// breaching its minimum health factor. Returns the amount
    /// actually released.
    pub fn withdraw_collateral(&mut self, caller: Address, amount: Amount) -> VaultResult<u64> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;

            let vault_address = vault.state.address;
            let requested = amount.resolve(vault.lending.max_withdrawable(vault_address));
            require_positive(requested)?;

            let released = vault.lending.withdraw(vault_address, requested)?;
            vault.tokens.transfer(
                vault.state.asset1,
                vault.lending.address(),
                vault_address,
                released,
            )?;

            vault.events.emit(VaultEvent::CollateralWithdrawn { amount: released });
            Ok(released)
        })
    }

    /// Borrow `amount` of the pegged asset against supplied
    /// collateral. The borrowed units are minted into the vault's
    /// idle balance; an LTV breach fails before anything moves.
    pub fn mint_debt(&mut self, caller: Address, amount: u64) -> VaultResult<()> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;
            require_positive(amount)?;

            let vault_address = vault.state.address;
            vault.lending.borrow(vault_address, amount)?;
            vault.tokens.mint(vault.state.asset0, vault_address, amount)?;

            vault.events.emit(VaultEvent::DebtMinted { amount });
            Ok(())
        })
    }

    /// Repay outstanding debt from idle asset0, destroying the
    /// repaid units. `Amount::All` resolves to the full outstanding
    /// debt, leaving exactly zero behind. Returns the amount applied.
    pub fn repay_debt(&mut self, caller: Address, amount: Amount) -> VaultResult<u64> {
        self.guarded(|vault| {
            vault.require_manager(caller)?;

            let vault_address = vault.state.address;
            let requested = amount.resolve(vault.lending.debt(vault_address));
            require_positive(requested)?;

            let (idle0, _) = vault.idle_balances();
            check!(
                requested <= idle0,
                VaultError::InsufficientBalance { available: idle0, requested }
            );

            let applied = vault.lending.repay(vault_address, requested)?;
            vault.tokens.burn(vault.state.asset0, vault_address, applied)?;

            vault.events.emit(VaultEvent::DebtRepaid { amount: applied });
            Ok(applied)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{funded_vault, MANAGER, NON_MANAGER};
    use rangevault_common::{Amount, VaultError, VaultEvent};

    const AMOUNT: u64 = 1_000_000_000;

    #[test]
    fn collateral_ops_are_manager_only() {
        let mut vault = funded_vault();
        assert_eq!(
            vault.supply_collateral(NON_MANAGER, AMOUNT),
            Err(VaultError::ManagerOnly)
        );
        assert_eq!(
            vault.withdraw_collateral(NON_MANAGER, Amount::All),
            Err(VaultError::ManagerOnly)
        );
        assert_eq!(vault.mint_debt(NON_MANAGER, AMOUNT), Err(VaultError::ManagerOnly));
        assert_eq!(
            vault.repay_debt(NON_MANAGER, Amount::All),
            Err(VaultError::ManagerOnly)
        );
    }

    #[test]
    fn supply_rejects_zero_and_more_than_idle() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();

        assert_eq!(
            vault.supply_collateral(MANAGER, 0),
            Err(VaultError::InvalidCollateralAmount)
        );
        assert!(matches!(
            vault.supply_collateral(MANAGER, AMOUNT + 1),
            Err(VaultError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn supply_moves_idle_into_market() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();

        vault.supply_collateral(MANAGER, AMOUNT / 2).unwrap();
        assert_eq!(vault.idle_balances(), (0, AMOUNT / 2));
        assert_eq!(vault.lending.supplied(vault.state.address), AMOUNT / 2);

        // Underlying value is preserved across the move.
        assert_eq!(vault.underlying_balance().unwrap(), AMOUNT);
        assert!(vault
            .events
            .events()
            .contains(&VaultEvent::CollateralSupplied { amount: AMOUNT / 2 }));
    }

    #[test]
    fn borrow_mints_pegged_asset() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();
        vault.supply_collateral(MANAGER, AMOUNT).unwrap();

        let borrow = AMOUNT / 4;
        vault.mint_debt(MANAGER, borrow).unwrap();

        let (idle0, idle1) = vault.idle_balances();
        assert_eq!(idle0, borrow);
        assert_eq!(idle1, 0);
        assert_eq!(vault.lending.debt(vault.state.address), borrow);

        // Debt nets out of the valuation at the current price.
        assert_eq!(vault.underlying_balance().unwrap(), AMOUNT);
    }

    #[test]
    fn borrow_beyond_ltv_fails_without_side_effects() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();
        vault.supply_collateral(MANAGER, AMOUNT).unwrap();

        let before = vault.idle_balances();
        assert!(matches!(
            vault.mint_debt(MANAGER, AMOUNT * 10),
            Err(VaultError::InsufficientBorrowPower { .. })
        ));
        assert_eq!(vault.idle_balances(), before);
        assert_eq!(vault.lending.debt(vault.state.address), 0);
    }

    #[test]
    fn repay_all_leaves_exactly_zero_debt() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();
        vault.supply_collateral(MANAGER, AMOUNT).unwrap();
        vault.mint_debt(MANAGER, AMOUNT / 4).unwrap();

        let applied = vault.repay_debt(MANAGER, Amount::All).unwrap();
        assert_eq!(applied, AMOUNT / 4);
        assert_eq!(vault.lending.debt(vault.state.address), 0);
        // Minted units were burned, not left idle.
        assert_eq!(vault.idle_balances().0, 0);
    }

    #[test]
    fn repay_all_with_no_debt_is_rejected() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();
        assert_eq!(
            vault.repay_debt(MANAGER, Amount::All),
            Err(VaultError::InvalidCollateralAmount)
        );
    }

    #[test]
    fn withdraw_all_releases_everything_when_debt_free() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();
        vault.supply_collateral(MANAGER, AMOUNT).unwrap();

        let released = vault.withdraw_collateral(MANAGER, Amount::All).unwrap();
        assert_eq!(released, AMOUNT);
        assert_eq!(vault.idle_balances(), (0, AMOUNT));
        assert_eq!(vault.lending.supplied(vault.state.address), 0);
    }

    #[test]
    fn withdraw_all_respects_outstanding_debt() {
        let mut vault = funded_vault();
        vault.mint(MANAGER, AMOUNT).unwrap();
        vault.supply_collateral(MANAGER, AMOUNT).unwrap();
        vault.mint_debt(MANAGER, AMOUNT / 4).unwrap();

        // All resolves to less than the full collateral while debt
        // is outstanding.
        let released = vault.withdraw_collateral(MANAGER, Amount::All).unwrap();
        assert!(released < AMOUNT);
        assert!(vault.lending.supplied(vault.state.address) > 0);

        // Asking for the remainder explicitly breaches the health
        // factor.
        let remaining = vault.lending.supplied(vault.state.address);
        assert_eq!(
            vault.withdraw_collateral(MANAGER, Amount::Exact(remaining)),
            Err(VaultError::HealthFactorBreach)
        );
    }
}
