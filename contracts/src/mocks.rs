//! Test doubles for local deployments and VM tests.
//!
//! - `MockV3Aggregator`: settable price feed
//! - `MockToken`: open-mint CEP-18 style token that can be told to fail
//! - `ReentrantToken`: token that calls back into the engine from its transfers

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;
use crate::types::RoundData;

/// Engine entry points a hostile collateral token re-enters
#[odra::external_contract]
pub trait CollateralVault {
    fn deposit_collateral(&mut self, token_collateral_address: Address, amount_collateral: U256);
    fn redeem_collateral(&mut self, token_collateral_address: Address, amount_collateral: U256);
}

/// Price feed whose answer is set by anyone
#[odra::module]
pub struct MockV3Aggregator {
    decimals: Var<u8>,
    latest_answer: Var<i64>,
    latest_timestamp: Var<u64>,
    latest_started_at: Var<u64>,
    latest_round: Var<u64>,
}

#[odra::module]
impl MockV3Aggregator {
    pub fn init(&mut self, decimals: u8, initial_answer: i64) {
        self.decimals.set(decimals);
        self.update_answer(initial_answer);
    }

    /// Publish `answer` as a new round at the current block time
    pub fn update_answer(&mut self, answer: i64) {
        let now = self.env().get_block_time();
        let round = self.latest_round.get().unwrap_or(0) + 1;
        self.latest_answer.set(answer);
        self.latest_timestamp.set(now);
        self.latest_started_at.set(now);
        self.latest_round.set(round);
    }

    /// Overwrite the latest round verbatim
    pub fn update_round_data(&mut self, round_id: u64, answer: i64, timestamp: u64, started_at: u64) {
        self.latest_round.set(round_id);
        self.latest_answer.set(answer);
        self.latest_timestamp.set(timestamp);
        self.latest_started_at.set(started_at);
    }

    pub fn latest_round_data(&self) -> RoundData {
        let round_id = self.latest_round.get().unwrap_or(0);
        RoundData {
            round_id,
            answer: self.latest_answer.get().unwrap_or(0),
            started_at: self.latest_started_at.get().unwrap_or(0),
            updated_at: self.latest_timestamp.get().unwrap_or(0),
            answered_in_round: round_id,
        }
    }

    pub fn latest_answer(&self) -> i64 {
        self.latest_answer.get().unwrap_or(0)
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(0)
    }
}

/// Open-mint token; `set_fail_*` make the matching calls return `false`
#[odra::module]
pub struct MockToken {
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
    fail_transfers: Var<bool>,
    fail_mints: Var<bool>,
}

#[odra::module]
impl MockToken {
    pub fn init(&mut self) {
        self.total_supply.set(U256::zero());
        self.fail_transfers.set(false);
        self.fail_mints.set(false);
    }

    pub fn mint(&mut self, to: Address, amount: U256) -> bool {
        if self.fail_mints.get().unwrap_or(false) {
            return false;
        }
        let balance = self.balance_of(to);
        self.balances.set(&to, balance + amount);
        self.total_supply.set(self.total_supply() + amount);
        true
    }

    pub fn burn(&mut self, amount: U256) {
        let caller = self.env().caller();
        let balance = self.balance_of(caller);
        if balance < amount {
            self.env().revert(DscError::InsufficientTokenBalance);
        }
        self.balances.set(&caller, balance - amount);
        self.total_supply.set(self.total_supply() - amount);
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        if self.fail_transfers.get().unwrap_or(false) {
            return false;
        }
        let sender = self.env().caller();
        self.move_balance(sender, recipient, amount);
        true
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        if self.fail_transfers.get().unwrap_or(false) {
            return false;
        }
        let spender = self.env().caller();
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            self.env().revert(DscError::InsufficientAllowance);
        }
        self.allowances.set(&(owner, spender), allowance - amount);
        self.move_balance(owner, recipient, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    pub fn set_fail_transfers(&mut self, fail: bool) {
        self.fail_transfers.set(fail);
    }

    pub fn set_fail_mints(&mut self, fail: bool) {
        self.fail_mints.set(fail);
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(DscError::InsufficientTokenBalance);
        }
        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);
    }
}

/// Collateral token that, once armed, re-enters `target` mid-transfer:
/// `transfer_from` calls `deposit_collateral` and `transfer` calls
/// `redeem_collateral`, both with itself as the token.
#[odra::module]
pub struct ReentrantToken {
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
    target: Var<Address>,
    armed: Var<bool>,
}

#[odra::module]
impl ReentrantToken {
    pub fn init(&mut self) {
        self.armed.set(false);
    }

    pub fn mint(&mut self, to: Address, amount: U256) -> bool {
        let balance = self.balance_of(to);
        self.balances.set(&to, balance + amount);
        true
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) -> bool {
        let sender = self.env().caller();
        self.move_balance(sender, recipient, amount);
        if let Some(mut vault) = self.armed_target() {
            vault.redeem_collateral(self.env().self_address(), amount);
        }
        true
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) -> bool {
        let spender = self.env().caller();
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            self.env().revert(DscError::InsufficientAllowance);
        }
        self.allowances.set(&(owner, spender), allowance - amount);
        self.move_balance(owner, recipient, amount);
        if let Some(mut vault) = self.armed_target() {
            vault.deposit_collateral(self.env().self_address(), amount);
        }
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let owner = self.env().caller();
        self.allowances.set(&(owner, spender), amount);
        true
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or(U256::zero())
    }

    pub fn set_target(&mut self, target: Address) {
        self.target.set(target);
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.armed.set(armed);
    }

    fn armed_target(&self) -> Option<CollateralVaultContractRef> {
        if !self.armed.get().unwrap_or(false) {
            return None;
        }
        self.target
            .get()
            .map(|target| CollateralVaultContractRef::new(self.env(), target))
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(DscError::InsufficientTokenBalance);
        }
        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);
    }
}
