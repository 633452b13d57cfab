use odra::casper_types::U256;
use pretty_assertions::assert_eq;

use cspr_dsc_contracts::errors::DscError;
use cspr_dsc_contracts::events::{CollateralRedeemed, Liquidated};

use crate::fixture::{amount_collateral, ether, setup, starting_balance, Fixture};

/// $18 with 8 decimals; 10 ETH backing 100 DSC drops to a 0.9 health factor
const CRASHED_ETH_PRICE: i64 = 18_0000_0000;

/// `user` at 100 DSC against 10 ETH, `liquidator` holding 100 DSC against
/// 20 ETH, then ETH crashes to $18.
fn liquidatable() -> Fixture {
    let mut f = setup();
    let (user, liquidator) = (f.user, f.liquidator);
    f.weth.mint(liquidator, ether(10));
    f.deposit_weth_and_mint(user, amount_collateral(), ether(100));
    f.deposit_weth_and_mint(liquidator, ether(20), ether(100));
    f.set_eth_price(CRASHED_ETH_PRICE);
    f
}

#[test]
fn test_cant_liquidate_good_health_factor() {
    let mut f = setup();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    f.weth.mint(liquidator, ether(10));
    f.deposit_weth_and_mint(user, amount_collateral(), ether(100));
    f.deposit_weth_and_mint(liquidator, ether(20), ether(100));
    f.approve_dsc(liquidator, ether(100));

    assert_eq!(
        f.engine.try_liquidate(weth, user, ether(100)),
        Err(DscError::HealthFactorOk.into())
    );
}

#[test]
fn test_liquidate_input_validation() {
    let mut f = liquidatable();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    let engine = f.engine_address();
    f.env.set_caller(liquidator);

    assert_eq!(
        f.engine.try_liquidate(weth, user, U256::zero()),
        Err(DscError::AmountMustBeMoreThanZero.into())
    );
    assert_eq!(
        f.engine.try_liquidate(engine, user, ether(100)),
        Err(DscError::TokenNotAllowed.into())
    );
}

#[test]
fn test_liquidation_pays_principal_plus_bonus() {
    let mut f = liquidatable();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    let starting_user_hf = f.engine.get_health_factor(user);
    assert_eq!(starting_user_hf, U256::from(900_000_000_000_000_000u64));

    f.approve_dsc(liquidator, ether(100));
    f.engine.liquidate(weth, user, ether(100));

    // 100 / 18 = 5.555.. ETH plus 10%
    let expected_payout = U256::from(6_111_111_111_111_111_110u128);
    assert_eq!(f.weth.balance_of(liquidator), expected_payout);
    assert_eq!(
        f.engine.get_collateral_balance_of_user(user, weth),
        amount_collateral() - expected_payout
    );
    assert_eq!(f.engine.get_dsc_minted(user), U256::zero());
    assert_eq!(f.dsc.balance_of(liquidator), U256::zero());
    // User keeps the DSC they minted; only their debt was repaid
    assert_eq!(f.dsc.balance_of(user), ether(100));
    assert!(f.engine.get_health_factor(user) > starting_user_hf);

    assert!(f.env.emitted_event(
        &f.engine,
        CollateralRedeemed {
            redeemed_from: user,
            redeemed_to: liquidator,
            token: weth,
            amount: expected_payout,
        }
    ));
    assert!(f.env.emitted_event(
        &f.engine,
        Liquidated {
            user,
            liquidator,
            token: weth,
            debt_covered: ether(100),
            collateral_seized: expected_payout,
        }
    ));
}

#[test]
fn test_liquidator_position_is_untouched() {
    let mut f = liquidatable();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    f.approve_dsc(liquidator, ether(100));
    f.engine.liquidate(weth, user, ether(100));

    let (liquidator_minted, _) = f.engine.get_account_information(liquidator);
    assert_eq!(liquidator_minted, ether(100));
    assert_eq!(f.engine.get_collateral_balance_of_user(liquidator, weth), ether(20));
}

#[test]
fn test_partial_liquidation_improves_health_factor() {
    let mut f = liquidatable();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    let before = f.engine.get_health_factor(user);

    f.approve_dsc(liquidator, ether(40));
    f.engine.liquidate(weth, user, ether(40));

    assert_eq!(f.engine.get_dsc_minted(user), ether(60));
    assert!(f.engine.get_health_factor(user) > before);
}

#[test]
fn test_liquidation_must_improve_health_factor() {
    let mut f = setup();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    f.weth.mint(liquidator, ether(10));
    f.deposit_weth_and_mint(user, amount_collateral(), ether(10_000));
    f.deposit_weth_and_mint(liquidator, ether(20), ether(1_000));
    // Collateral worth 105% of debt: seizing 110% per dollar repaid worsens the ratio
    f.set_eth_price(1050_0000_0000);

    f.approve_dsc(liquidator, ether(1_000));
    assert_eq!(
        f.engine.try_liquidate(weth, user, ether(1_000)),
        Err(DscError::HealthFactorNotImproved.into())
    );
    assert_eq!(f.engine.get_collateral_balance_of_user(user, weth), amount_collateral());
    assert_eq!(f.engine.get_dsc_minted(user), ether(10_000));
    assert_eq!(f.dsc.balance_of(liquidator), ether(1_000));
    assert_eq!(f.weth.balance_of(liquidator), U256::zero());
}

#[test]
fn test_cant_seize_more_than_deposited() {
    let mut f = setup();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    f.weth.mint(liquidator, ether(10));
    f.deposit_weth_and_mint(user, amount_collateral(), ether(10_000));
    f.deposit_weth_and_mint(liquidator, ether(20), ether(100));
    f.set_eth_price(5_0000_0000);

    // 100 / 5 * 1.1 = 22 ETH, user only has 10
    f.approve_dsc(liquidator, ether(100));
    assert_eq!(
        f.engine.try_liquidate(weth, user, ether(100)),
        Err(DscError::RedeemExceedsDeposit.into())
    );
}

#[test]
fn test_liquidator_must_stay_healthy() {
    let mut f = setup();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    f.deposit_weth_and_mint(user, amount_collateral(), ether(100));
    // 1 ETH backing 100 DSC: fine at $2000, broken at $18
    f.deposit_weth_and_mint(liquidator, ether(1), ether(100));
    f.set_eth_price(CRASHED_ETH_PRICE);

    f.approve_dsc(liquidator, ether(100));
    assert_eq!(
        f.engine.try_liquidate(weth, user, ether(100)),
        Err(DscError::BrokenHealthFactor.into())
    );
    assert_eq!(f.weth.balance_of(liquidator), starting_balance() - ether(1));
    assert_eq!(f.engine.get_dsc_minted(user), ether(100));
}

#[test]
fn test_liquidator_must_fund_the_burn() {
    let mut f = liquidatable();
    let (user, liquidator) = (f.user, f.liquidator);
    let weth = f.weth_address();
    f.env.set_caller(liquidator);

    assert_eq!(
        f.engine.try_liquidate(weth, user, ether(100)),
        Err(DscError::InsufficientAllowance.into())
    );
    assert_eq!(f.engine.get_collateral_balance_of_user(user, weth), amount_collateral());
    assert_eq!(f.weth.balance_of(liquidator), U256::zero());
}
