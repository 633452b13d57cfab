//! Shared deployment used by every scenario.

use odra::casper_types::U256;
use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
use odra::prelude::*;

use cspr_dsc_contracts::engine::{DscEngine, DscEngineHostRef, DscEngineInitArgs};
use cspr_dsc_contracts::mocks::{
    MockToken, MockTokenHostRef, MockV3Aggregator, MockV3AggregatorHostRef, MockV3AggregatorInitArgs,
};
use cspr_dsc_contracts::stablecoin::{DecentralizedStableCoin, DecentralizedStableCoinHostRef};

/// $2000 with 8 decimals
pub const ETH_USD_PRICE: i64 = 2000_0000_0000;
/// $1000 with 8 decimals
pub const BTC_USD_PRICE: i64 = 1000_0000_0000;
pub const FEED_DECIMALS: u8 = 8;

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(1_000_000_000_000_000_000u64)
}

pub fn amount_collateral() -> U256 {
    ether(10)
}

pub fn starting_balance() -> U256 {
    ether(10)
}

pub struct Fixture {
    pub env: HostEnv,
    pub engine: DscEngineHostRef,
    pub dsc: DecentralizedStableCoinHostRef,
    pub weth: MockTokenHostRef,
    pub wbtc: MockTokenHostRef,
    pub eth_usd_feed: MockV3AggregatorHostRef,
    pub btc_usd_feed: MockV3AggregatorHostRef,
    pub deployer: Address,
    pub user: Address,
    pub liquidator: Address,
}

pub fn deploy_feed(env: &HostEnv, answer: i64) -> MockV3AggregatorHostRef {
    MockV3Aggregator::deploy(
        env,
        MockV3AggregatorInitArgs {
            decimals: FEED_DECIMALS,
            initial_answer: answer,
        },
    )
}

/// Engine over WETH and WBTC mocks, owning a fresh DSC token.
/// `user` and `liquidator` each hold `starting_balance()` WETH and WBTC.
pub fn setup() -> Fixture {
    let env = odra_test::env();
    let deployer = env.get_account(0);
    let user = env.get_account(1);
    let liquidator = env.get_account(2);
    env.set_caller(deployer);

    let eth_usd_feed = deploy_feed(&env, ETH_USD_PRICE);
    let btc_usd_feed = deploy_feed(&env, BTC_USD_PRICE);
    let mut weth = MockToken::deploy(&env, NoArgs);
    let mut wbtc = MockToken::deploy(&env, NoArgs);
    let mut dsc = DecentralizedStableCoin::deploy(&env, NoArgs);

    let engine = DscEngine::deploy(
        &env,
        DscEngineInitArgs {
            token_addresses: vec![weth.address().clone(), wbtc.address().clone()],
            price_feed_addresses: vec![eth_usd_feed.address().clone(), btc_usd_feed.address().clone()],
            dsc_address: dsc.address().clone(),
        },
    );
    dsc.transfer_ownership(engine.address().clone());

    for account in [user, liquidator] {
        weth.mint(account, starting_balance());
        wbtc.mint(account, starting_balance());
    }

    Fixture {
        env,
        engine,
        dsc,
        weth,
        wbtc,
        eth_usd_feed,
        btc_usd_feed,
        deployer,
        user,
        liquidator,
    }
}

impl Fixture {
    pub fn engine_address(&self) -> Address {
        self.engine.address().clone()
    }

    pub fn weth_address(&self) -> Address {
        self.weth.address().clone()
    }

    pub fn wbtc_address(&self) -> Address {
        self.wbtc.address().clone()
    }

    /// `account` approves and deposits `amount` WETH.
    pub fn deposit_weth(&mut self, account: Address, amount: U256) {
        let engine = self.engine_address();
        let weth = self.weth_address();
        self.env.set_caller(account);
        self.weth.approve(engine, amount);
        self.engine.deposit_collateral(weth, amount);
    }

    /// `account` approves, deposits `collateral` WETH and mints `to_mint` DSC.
    pub fn deposit_weth_and_mint(&mut self, account: Address, collateral: U256, to_mint: U256) {
        let engine = self.engine_address();
        let weth = self.weth_address();
        self.env.set_caller(account);
        self.weth.approve(engine, collateral);
        self.engine.deposit_collateral_and_mint_dsc(weth, collateral, to_mint);
    }

    /// `account` lets the engine pull `amount` DSC.
    pub fn approve_dsc(&mut self, account: Address, amount: U256) {
        let engine = self.engine_address();
        self.env.set_caller(account);
        self.dsc.approve(engine, amount);
    }

    pub fn set_eth_price(&mut self, answer: i64) {
        self.env.set_caller(self.deployer);
        self.eth_usd_feed.update_answer(answer);
    }
}
