//! Deploy the DSC system to Casper livenet/testnet using Odra livenet environment.
//!
//! Usage:
//!   cargo run --bin deploy_livenet --release
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!
//! Optional, to back DSC with already deployed tokens and feeds (comma separated,
//! same order):
//!   DSC_COLLATERAL_TOKENS=hash-...,hash-...
//!   DSC_PRICE_FEEDS=hash-...,hash-...
//!
//! Without them, mock WETH/WBTC tokens and $2000/$1000 feeds are deployed.

use std::str::FromStr;

use odra::host::{Deployer, HostEnv, HostRef, NoArgs};
use odra::prelude::*;

use cspr_dsc_contracts::engine::{DscEngine, DscEngineInitArgs};
use cspr_dsc_contracts::math::FEED_DECIMALS;
use cspr_dsc_contracts::mocks::{MockToken, MockV3Aggregator, MockV3AggregatorInitArgs};
use cspr_dsc_contracts::stablecoin::DecentralizedStableCoin;

const COLLATERAL_TOKENS_VAR: &str = "DSC_COLLATERAL_TOKENS";
const PRICE_FEEDS_VAR: &str = "DSC_PRICE_FEEDS";
const DEPLOYMENTS_FILE: &str = "deployments.json";

/// $2000 and $1000 with 8 decimals
const MOCK_ETH_USD_PRICE: i64 = 2000_0000_0000;
const MOCK_BTC_USD_PRICE: i64 = 1000_0000_0000;

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();

    println!("=== CSPR-DSC Livenet Deployment ===");
    println!();

    let env = odra_casper_livenet_env::env();

    // Configure payment amount for deployments/calls (required for Casper 2.0 txs)
    let payment_amount: u64 = std::env::var("ODRA_CASPER_LIVENET_PAYMENT_AMOUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(200_000_000_000);
    env.set_gas(payment_amount);

    let deployer = env.caller();
    println!("Deployer: {:?}", deployer);
    println!();

    // ==================== Phase 1: Collateral ====================
    println!("=== Phase 1: Collateral Tokens and Price Feeds ===");
    println!();

    let (token_addresses, price_feed_addresses) = match configured_collateral() {
        Ok(Some(collateral)) => {
            println!("Using collateral from {} / {}", COLLATERAL_TOKENS_VAR, PRICE_FEEDS_VAR);
            collateral
        }
        Ok(None) => deploy_mock_collateral(&env),
        Err(message) => {
            eprintln!("Invalid collateral configuration: {}", message);
            std::process::exit(1);
        }
    };
    for (token, feed) in token_addresses.iter().zip(price_feed_addresses.iter()) {
        println!("  {:?} priced by {:?}", token, feed);
    }
    println!();

    // ==================== Phase 2: Stablecoin and Engine ====================
    println!("=== Phase 2: Deploying Stablecoin and Engine ===");
    println!();

    println!("Deploying DecentralizedStableCoin...");
    let mut dsc = DecentralizedStableCoin::deploy(&env, NoArgs);
    let dsc_addr = dsc.address().clone();
    println!("DecentralizedStableCoin deployed at: {:?}", dsc_addr);

    println!("Deploying DscEngine...");
    let engine = DscEngine::deploy(
        &env,
        DscEngineInitArgs {
            token_addresses: token_addresses.clone(),
            price_feed_addresses: price_feed_addresses.clone(),
            dsc_address: dsc_addr,
        },
    );
    let engine_addr = engine.address().clone();
    println!("DscEngine deployed at: {:?}", engine_addr);

    println!();

    // ==================== Phase 3: Hand-over ====================
    println!("=== Phase 3: Handing Mint Rights to the Engine ===");
    println!();

    println!("Transferring DecentralizedStableCoin ownership to DscEngine...");
    dsc.transfer_ownership(engine_addr);
    println!("Done.");

    println!();
    println!("=== Deployment Complete ===");
    println!();
    println!("Contract Addresses:");
    println!("  DecentralizedStableCoin: {:?}", dsc_addr);
    println!("  DscEngine:               {:?}", engine_addr);

    let deployments = serde_json::json!({
        "deployer": format!("{:?}", deployer),
        "stablecoin": format!("{:?}", dsc_addr),
        "engine": format!("{:?}", engine_addr),
        "collateral": token_addresses
            .iter()
            .zip(price_feed_addresses.iter())
            .map(|(token, feed)| serde_json::json!({
                "token": format!("{:?}", token),
                "price_feed": format!("{:?}", feed),
            }))
            .collect::<Vec<_>>(),
    });
    match serde_json::to_string_pretty(&deployments) {
        Ok(json) => match std::fs::write(DEPLOYMENTS_FILE, json) {
            Ok(()) => println!("Addresses written to {}", DEPLOYMENTS_FILE),
            Err(e) => eprintln!("Could not write {}: {}", DEPLOYMENTS_FILE, e),
        },
        Err(e) => eprintln!("Could not serialize deployments: {}", e),
    }
}

/// Collateral from the environment, `None` when neither variable is set.
fn configured_collateral() -> Result<Option<(Vec<Address>, Vec<Address>)>, String> {
    let tokens = std::env::var(COLLATERAL_TOKENS_VAR).ok();
    let feeds = std::env::var(PRICE_FEEDS_VAR).ok();
    match (tokens, feeds) {
        (None, None) => Ok(None),
        (Some(tokens), Some(feeds)) => {
            let tokens = parse_addresses(&tokens)?;
            let feeds = parse_addresses(&feeds)?;
            if tokens.len() != feeds.len() {
                return Err(format!(
                    "{} tokens but {} price feeds",
                    tokens.len(),
                    feeds.len()
                ));
            }
            Ok(Some((tokens, feeds)))
        }
        _ => Err(format!("{} and {} must be set together", COLLATERAL_TOKENS_VAR, PRICE_FEEDS_VAR)),
    }
}

fn parse_addresses(list: &str) -> Result<Vec<Address>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Address::from_str(s).map_err(|e| format!("{}: {:?}", s, e)))
        .collect()
}

fn deploy_mock_collateral(env: &HostEnv) -> (Vec<Address>, Vec<Address>) {
    let mut tokens = Vec::new();
    let mut feeds = Vec::new();
    for (symbol, price) in [("WETH", MOCK_ETH_USD_PRICE), ("WBTC", MOCK_BTC_USD_PRICE)] {
        println!("Deploying mock {}...", symbol);
        let token = MockToken::deploy(env, NoArgs);
        println!("Mock {} deployed at: {:?}", symbol, token.address().clone());

        println!("Deploying {}/USD feed...", symbol);
        let feed = MockV3Aggregator::deploy(
            env,
            MockV3AggregatorInitArgs {
                decimals: FEED_DECIMALS,
                initial_answer: price,
            },
        );
        println!("{}/USD feed deployed at: {:?}", symbol, feed.address().clone());

        tokens.push(token.address().clone());
        feeds.push(feed.address().clone());
    }
    (tokens, feeds)
}
