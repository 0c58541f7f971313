//! Fee Engine
//!
//! Owned fee state for a single vault: the managing and performance
//! fee rates plus the accrued, owner-claimable manager balances.
//!
//! Two fee flows exist:
//! - the **performance fee** is taken from trading fees at harvest
//!   time (explicit pull or the collection inside a liquidity
//!   removal), per asset;
//! - the **managing fee** is taken from the underlying amount paid
//!   out on every share burn, in asset1.
//!
//! `collect` is the only way balances leave this struct.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::fees::{MAX_MANAGING_FEE_BPS, MAX_PERFORMANCE_FEE_BPS};
use crate::errors::{VaultError, VaultResult};
use crate::math::{fee_amount, safe_add, safe_sub};
use crate::types::FeeData;

/// Fee rates and accrued manager balances for one vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize,
    BorshDeserialize,
)]
pub struct FeeState {
    /// Fee on withdrawn underlying, BPS (capped at 100)
    pub managing_fee_bps: u16,
    /// Fee on harvested trading fees, BPS (capped at 10_000)
    pub performance_fee_bps: u16,
    /// Accrued manager balance in asset0 base units
    pub manager_balance0: u64,
    /// Accrued manager balance in asset1 base units
    pub manager_balance1: u64,
}

impl FeeState {
    /// Overwrite both fee rates, enforcing the caps.
    pub fn update(&mut self, managing_bps: u16, performance_bps: u16) -> VaultResult<()> {
        if managing_bps > MAX_MANAGING_FEE_BPS {
            return Err(VaultError::InvalidManagingFee { bps: managing_bps });
        }
        if performance_bps > MAX_PERFORMANCE_FEE_BPS {
            return Err(VaultError::InvalidPerformanceFee { bps: performance_bps });
        }
        self.managing_fee_bps = managing_bps;
        self.performance_fee_bps = performance_bps;
        Ok(())
    }

    /// Take the performance cut from a fee harvest. Credits the
    /// manager balances and returns the remainder that stays in the
    /// vault's idle balances as `(net0, net1)`.
    pub fn apply_performance(&mut self, fee0: u64, fee1: u64) -> VaultResult<(u64, u64)> {
        let cut0 = fee_amount(fee0, self.performance_fee_bps)?;
        let cut1 = fee_amount(fee1, self.performance_fee_bps)?;
        self.manager_balance0 = safe_add(self.manager_balance0, cut0)?;
        self.manager_balance1 = safe_add(self.manager_balance1, cut1)?;
        Ok((safe_sub(fee0, cut0)?, safe_sub(fee1, cut1)?))
    }

    /// Take the managing cut from a withdrawal paid in asset1.
    /// Returns `(net, fee)` where `net` goes to the holder.
    pub fn apply_managing(&mut self, amount: u64) -> VaultResult<(u64, u64)> {
        let cut = fee_amount(amount, self.managing_fee_bps)?;
        self.manager_balance1 = safe_add(self.manager_balance1, cut)?;
        Ok((safe_sub(amount, cut)?, cut))
    }

    /// Drain both accrued balances to zero, returning `(balance0,
    /// balance1)` for the orchestrator to transfer to the manager.
    pub fn collect(&mut self) -> (u64, u64) {
        let out = (self.manager_balance0, self.manager_balance1);
        self.manager_balance0 = 0;
        self.manager_balance1 = 0;
        out
    }

    /// Read-only snapshot for the fee view.
    pub fn data(&self) -> FeeData {
        FeeData {
            managing_fee_bps: self.managing_fee_bps,
            performance_fee_bps: self.performance_fee_bps,
            manager_balance0: self.manager_balance0,
            manager_balance1: self.manager_balance1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_enforces_caps() {
        let mut fees = FeeState::default();
        assert!(fees.update(100, 300).is_ok());
        assert_eq!(fees.managing_fee_bps, 100);
        assert_eq!(fees.performance_fee_bps, 300);

        assert_eq!(fees.update(101, 100), Err(VaultError::InvalidManagingFee { bps: 101 }));
        assert_eq!(
            fees.update(100, 10_001),
            Err(VaultError::InvalidPerformanceFee { bps: 10_001 })
        );
        // Failed updates leave rates untouched
        assert_eq!(fees.managing_fee_bps, 100);
        assert_eq!(fees.performance_fee_bps, 300);
    }

    #[test]
    fn test_performance_fee_split() {
        let mut fees = FeeState::default();
        fees.update(50, 2_500).unwrap(); // 25% performance

        let (net0, net1) = fees.apply_performance(4_000, 8_000).unwrap();
        assert_eq!(net0, 3_000);
        assert_eq!(net1, 6_000);
        assert_eq!(fees.manager_balance0, 1_000);
        assert_eq!(fees.manager_balance1, 2_000);

        // Accrues across multiple harvests
        fees.apply_performance(4_000, 0).unwrap();
        assert_eq!(fees.manager_balance0, 2_000);
    }

    #[test]
    fn test_managing_fee_split() {
        let mut fees = FeeState::default();
        fees.update(50, 0).unwrap(); // 0.5% managing

        let (net, cut) = fees.apply_managing(1_000_000).unwrap();
        assert_eq!(net, 995_000);
        assert_eq!(cut, 5_000);
        assert_eq!(fees.manager_balance1, 5_000);
        assert_eq!(fees.manager_balance0, 0);
    }

    #[test]
    fn test_zero_managing_fee_round_trip() {
        let mut fees = FeeState::default();
        let (net, cut) = fees.apply_managing(1_000_000).unwrap();
        assert_eq!(net, 1_000_000);
        assert_eq!(cut, 0);
    }

    #[test]
    fn test_collect_drains_balances() {
        let mut fees = FeeState::default();
        fees.update(100, 10_000).unwrap(); // performance takes all
        fees.apply_performance(123, 456).unwrap();

        assert_eq!(fees.collect(), (123, 456));
        assert_eq!(fees.collect(), (0, 0));
        assert_eq!(fees.data().manager_balance1, 0);
    }
}
