//! Validation Helpers for the rangevault Protocol
//!
//! Centralized validation for vault operations: the tick-range
//! validator and the guard helpers consulted at every operation
//! prologue. Everything here is a pure predicate with no side
//! effects, rejected before any state mutation.

use crate::constants::ticks::{MAX_TICK, MIN_TICK};
use crate::errors::{VaultError, VaultResult};
use crate::types::{Address, ZERO_ADDRESS};

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
///
/// # Examples
///
/// ```rust,ignore
/// use rangevault_common::check;
///
/// check!(amount > 0, VaultError::InvalidCollateralAmount);
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use crate::check;

// ============ Range Validator ============

/// Validates a tick pair against the global bounds and the pool's
/// tick spacing.
///
/// Checked in this order:
/// 1. both ticks within `[MIN_TICK, MAX_TICK]`, else `TicksOutOfRange`
/// 2. both ticks exact multiples of `spacing`, else `InvalidTicksSpacing`
/// 3. `lower < upper`, else `InvalidTickOrder`
pub fn validate_ticks(lower: i32, upper: i32, spacing: i32) -> VaultResult<()> {
    check!(
        lower >= MIN_TICK && lower <= MAX_TICK && upper >= MIN_TICK && upper <= MAX_TICK,
        VaultError::TicksOutOfRange { lower, upper }
    );
    check!(
        spacing > 0 && lower % spacing == 0 && upper % spacing == 0,
        VaultError::InvalidTicksSpacing { lower, upper, spacing }
    );
    check!(lower < upper, VaultError::InvalidTickOrder { lower, upper });
    Ok(())
}

// ============ Guard Helpers ============

/// Require a non-zero amount.
pub fn require_positive(amount: u64) -> VaultResult<()> {
    check!(amount > 0, VaultError::InvalidCollateralAmount);
    Ok(())
}

/// Require the caller to be the designated manager.
pub fn require_manager(is_manager: bool) -> VaultResult<()> {
    check!(is_manager, VaultError::ManagerOnly);
    Ok(())
}

/// Require the vault to not be paused.
pub fn require_not_paused(is_paused: bool) -> VaultResult<()> {
    check!(!is_paused, VaultError::VaultPaused);
    Ok(())
}

/// Require a holder to have at least `requested` shares.
pub fn require_sufficient_shares(available: u64, requested: u64) -> VaultResult<()> {
    check!(
        available >= requested,
        VaultError::InsufficientShares { available, requested }
    );
    Ok(())
}

/// Require two token identities to form a usable pool pair:
/// both non-zero and distinct.
pub fn require_valid_token_pair(token0: Address, token1: Address) -> VaultResult<()> {
    check!(
        token0 != ZERO_ADDRESS && token1 != ZERO_ADDRESS && token0 != token1,
        VaultError::InvalidTokenPair
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACING: i32 = 60; // fee tier 3000

    #[test]
    fn test_full_range_accepted() {
        assert!(validate_ticks(-887220, 887220, SPACING).is_ok());
    }

    #[test]
    fn test_out_of_range_ticks_rejected() {
        assert_eq!(
            validate_ticks(-887273, 0, SPACING),
            Err(VaultError::TicksOutOfRange { lower: -887273, upper: 0 })
        );
        assert_eq!(
            validate_ticks(0, 887273, SPACING),
            Err(VaultError::TicksOutOfRange { lower: 0, upper: 887273 })
        );
    }

    #[test]
    fn test_misaligned_ticks_rejected() {
        assert_eq!(
            validate_ticks(0, 1, SPACING),
            Err(VaultError::InvalidTicksSpacing { lower: 0, upper: 1, spacing: SPACING })
        );
        // Reversed and misaligned: spacing is reported first.
        assert_eq!(
            validate_ticks(1, 0, SPACING),
            Err(VaultError::InvalidTicksSpacing { lower: 1, upper: 0, spacing: SPACING })
        );
    }

    #[test]
    fn test_reversed_aligned_ticks_rejected() {
        assert_eq!(
            validate_ticks(60, -60, SPACING),
            Err(VaultError::InvalidTickOrder { lower: 60, upper: -60 })
        );
        assert_eq!(
            validate_ticks(0, 0, SPACING),
            Err(VaultError::InvalidTickOrder { lower: 0, upper: 0 })
        );
    }

    #[test]
    fn test_negative_aligned_range_accepted() {
        // A narrow stable-pair range, entirely negative
        assert!(validate_ticks(-276480, -276300, SPACING).is_ok());
    }

    #[test]
    fn test_token_pair_validation() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert!(require_valid_token_pair(a, b).is_ok());
        assert_eq!(require_valid_token_pair(a, a), Err(VaultError::InvalidTokenPair));
        assert_eq!(
            require_valid_token_pair(ZERO_ADDRESS, b),
            Err(VaultError::InvalidTokenPair)
        );
    }

    #[test]
    fn test_guards() {
        assert!(require_positive(1).is_ok());
        assert_eq!(require_positive(0), Err(VaultError::InvalidCollateralAmount));
        assert_eq!(require_manager(false), Err(VaultError::ManagerOnly));
        assert_eq!(require_not_paused(true), Err(VaultError::VaultPaused));
        assert_eq!(
            require_sufficient_shares(5, 6),
            Err(VaultError::InsufficientShares { available: 5, requested: 6 })
        );
    }
}
