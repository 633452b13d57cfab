//! CSPR-DSC Contracts
//!
//! Casper-native overcollateralized stablecoin engine.
//!
//! ## Architecture
//!
//! - **DscEngine**: collateral and debt ledgers, health factor, liquidation
//! - **DecentralizedStableCoin (DSC)**: CEP-18 stablecoin, minted and burned only by the engine
//! - **OracleLib**: staleness guard over aggregator price feeds
//! - **math**: fixed-point valuation and health factor arithmetic
//!
//! ## Solvency
//!
//! Only half of the USD value of deposited collateral counts toward backing
//! debt (200% overcollateralization). A position whose health factor drops
//! below 1.0 can be liquidated by anyone repaying part of its debt in
//! exchange for the equivalent collateral plus a 10% bonus.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod types;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod math;
pub mod oracle;

// Contract modules
pub mod engine;
pub mod stablecoin;

// Local deployment and test doubles
pub mod mocks;
