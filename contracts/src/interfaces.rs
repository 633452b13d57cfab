//! External contract interfaces consumed by the engine.
//!
//! The engine never trusts a `false` return: every `bool` result is checked
//! and mapped to a `DscError`.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::types::RoundData;

/// CEP-18 collateral token
#[odra::external_contract]
pub trait Cep18Token {
    fn transfer(&mut self, recipient: Address, amount: U256) -> bool;
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool;
    fn balance_of(&self, account: Address) -> U256;
}

/// Issuance token capability (DSC)
#[odra::external_contract]
pub trait StableToken {
    fn mint(&mut self, to: Address, amount: U256) -> bool;
    fn burn(&mut self, amount: U256);
    fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool;
}

/// Aggregator-style USD price feed
#[odra::external_contract]
pub trait PriceFeed {
    fn latest_round_data(&self) -> RoundData;
    fn decimals(&self) -> u8;
}
