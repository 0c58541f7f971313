//! Full lifecycle of a funded vault: two depositors, a leveraged
//! position build-out, fee harvest, full unwind, and redemption.
//! Checks the share-sum invariant and value conservation at every
//! phase.

use rangevault_common::{Amount, EventType, SwapDirection};

use crate::testing::{funded_vault, ASSET0, ASSET1, MANAGER, USER2};

const LOWER: i32 = -887220;
const UPPER: i32 = 887220;

const DEPOSIT_M: u64 = 1_000_000_000;
const DEPOSIT_U: u64 = 500_000_000;

#[test]
fn leveraged_lifecycle_conserves_value() {
    let mut vault = funded_vault();
    vault.update_fees(MANAGER, 0, 500).unwrap(); // 5% performance

    // Phase 1: deposits. Bootstrap 1:1, then proportional.
    let shares_m = vault.mint(MANAGER, DEPOSIT_M).unwrap();
    let shares_u = vault.mint(USER2, DEPOSIT_U).unwrap();
    assert_eq!(shares_m, DEPOSIT_M);
    assert_eq!(shares_u, DEPOSIT_U);
    assert_eq!(vault.total_shares(), vault.state.share_sum());
    assert_eq!(vault.underlying_balance().unwrap(), DEPOSIT_M + DEPOSIT_U);

    // Phase 2: build the leveraged position. Supply most of the
    // deposits as collateral, borrow the pegged asset against it,
    // and put everything that is left into the pool.
    vault.supply_collateral(MANAGER, 1_200_000_000).unwrap();
    vault.mint_debt(MANAGER, 500_000_000).unwrap();
    assert_eq!(vault.idle_balances(), (500_000_000, 300_000_000));

    vault
        .add_liquidity(MANAGER, LOWER, UPPER, 500_000_000, 300_000_000)
        .unwrap();
    assert_eq!(vault.idle_balances(), (0, 0));
    assert!(vault.pool_data().in_position);

    // Value is conserved across every leg of the build-out.
    assert_eq!(vault.underlying_balance().unwrap(), DEPOSIT_M + DEPOSIT_U);

    // Phase 3: the position earns trading fees.
    vault.pool.credit_fees(vault.state.address, 1_000, 2_000, &mut vault.tokens);
    assert_eq!(vault.current_fees(), (1_000, 2_000));

    // Phase 4: full unwind. Close the position (harvesting fees
    // through the fee engine), repay all debt, release all
    // collateral, convert the remaining pegged units back to the
    // deposit asset.
    vault.remove_liquidity(MANAGER).unwrap();
    assert!(!vault.pool_data().in_position);
    assert_eq!(vault.fee_data().manager_balance0, 50);
    assert_eq!(vault.fee_data().manager_balance1, 100);

    let repaid = vault.repay_debt(MANAGER, Amount::All).unwrap();
    assert_eq!(repaid, 500_000_000);
    assert_eq!(vault.lending.debt(vault.state.address), 0);

    let released = vault.withdraw_collateral(MANAGER, Amount::All).unwrap();
    assert_eq!(released, 1_200_000_000);

    let (idle0, _) = vault.idle_balances();
    assert_eq!(idle0, 950); // harvested asset0 fees net of the cut
    vault.swap(MANAGER, SwapDirection::ZeroForOne, idle0, u64::MAX).unwrap();
    assert_eq!(vault.idle_balances().0, 0);

    // Everything the holders own is idle asset1 now: deposits plus
    // harvested fees net of the manager's performance cut.
    let expected = DEPOSIT_M + DEPOSIT_U + 950 + 1_900;
    assert_eq!(vault.underlying_balance().unwrap(), expected);

    // Phase 5: redemption. Payouts are proportional to shares; the
    // second redeemer drains what the first left behind.
    let m_before = vault.tokens.balance_of(ASSET1, MANAGER);
    let net_m = vault.burn(MANAGER, shares_m).unwrap();
    let expected_m = (shares_m as u128 * expected as u128 / (shares_m + shares_u) as u128) as u64;
    assert_eq!(net_m, expected_m);
    assert_eq!(vault.tokens.balance_of(ASSET1, MANAGER), m_before + net_m);

    let net_u = vault.burn(USER2, shares_u).unwrap();
    assert_eq!(vault.total_shares(), 0);
    assert_eq!(vault.state.share_sum(), 0);

    // Redemptions plus the manager's accrued balances account for
    // the whole vault, modulo integer-division dust.
    vault.collect_manager(MANAGER).unwrap();
    let dust = vault.tokens.balance_of(ASSET1, vault.state.address);
    assert!(dust <= 2, "residual {dust}");
    assert_eq!(vault.tokens.balance_of(ASSET0, vault.state.address), 0);
    assert!(net_m + net_u <= expected);
    assert!(net_m + net_u >= expected - 2);

    // The event stream covers every phase.
    for event_type in [
        EventType::Minted,
        EventType::CollateralSupplied,
        EventType::DebtMinted,
        EventType::LiquidityAdded,
        EventType::LiquidityRemoved,
        EventType::FeesEarned,
        EventType::DebtRepaid,
        EventType::CollateralWithdrawn,
        EventType::Swapped,
        EventType::Burned,
        EventType::ManagerCollected,
    ] {
        assert!(
            !vault.events.filter_by_type(event_type).is_empty(),
            "missing {event_type:?}"
        );
    }
}

#[test]
fn valuation_tracks_price_moves() {
    let mut vault = funded_vault();
    vault.mint(MANAGER, DEPOSIT_M).unwrap();
    vault.supply_collateral(MANAGER, DEPOSIT_M).unwrap();
    vault.mint_debt(MANAGER, DEPOSIT_M / 4).unwrap();

    // At 1:1 the borrow is value-neutral.
    assert_eq!(vault.underlying_balance().unwrap(), DEPOSIT_M);

    // The pegged asset appreciating 20% against the deposit asset
    // grows the idle borrowed units and the debt by the same value;
    // valuation must price both sides consistently.
    vault.pool.set_price(120_000_000);
    vault.lending.set_price(120_000_000);
    let valued = vault.underlying_balance().unwrap();
    assert_eq!(valued, DEPOSIT_M);
}

#[test]
fn later_depositor_pays_full_price_after_fees_accrue() {
    let mut vault = funded_vault();
    vault.mint(MANAGER, DEPOSIT_M).unwrap();
    vault.add_liquidity(MANAGER, LOWER, UPPER, 0, DEPOSIT_M).unwrap();

    // Harvested fees grow the underlying before the second deposit.
    vault.pool.credit_fees(vault.state.address, 0, 100_000_000, &mut vault.tokens);
    vault.pull_fee_from_pool(MANAGER).unwrap();

    let underlying = vault.underlying_balance().unwrap();
    assert_eq!(underlying, DEPOSIT_M + 100_000_000);

    let shares = vault.mint(USER2, DEPOSIT_U).unwrap();
    // Fewer shares per token than the bootstrap depositor got.
    assert!(shares < DEPOSIT_U);
    let expected = (DEPOSIT_U as u128 * DEPOSIT_M as u128 / underlying as u128) as u64;
    assert_eq!(shares, expected);
}
