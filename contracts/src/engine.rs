//! DSC Engine Contract
//!
//! Overcollateralized issuance of DSC against a fixed set of collateral
//! tokens. Holds two ledgers:
//! - collateral deposited per (user, token)
//! - DSC minted per user
//!
//! Every operation that can lower a position's solvency re-reads both ledgers
//! and live prices afterwards and reverts when the health factor drops below
//! `MIN_HEALTH_FACTOR`. A revert discards every write, event and nested
//! token call of the deploy, so no operation is ever partially applied.
//!
//! Within each primitive the order is: validate, write the ledger, emit the
//! event, then call the external token. A token that calls back into the
//! engine observes already-updated ledgers. State-changing entry points are
//! also guarded with `non_reentrant`; composites therefore call the internal
//! primitives, never the guarded entry points.

use odra::prelude::*;
use odra::casper_types::U256;
use crate::errors::DscError;
use crate::events::{CollateralDeposited, CollateralRedeemed, DscBurned, DscMinted, Liquidated};
use crate::interfaces::{Cep18TokenContractRef, StableTokenContractRef};
use crate::math::{
    self, ADDITIONAL_FEED_PRECISION, FEED_DECIMALS, LIQUIDATION_BONUS, LIQUIDATION_PRECISION,
    LIQUIDATION_THRESHOLD, MIN_HEALTH_FACTOR, PRECISION,
};
use crate::oracle::OracleLib;
use crate::types::AccountInformation;

/// Result type for engine internals
pub type EngineResult<T> = Result<T, DscError>;

/// DSC Engine Contract
#[odra::module(events = [CollateralDeposited, CollateralRedeemed, DscMinted, DscBurned, Liquidated])]
pub struct DscEngine {
    /// Accepted collateral tokens, in registration order
    collateral_tokens: Var<Vec<Address>>,
    /// Price feed per accepted collateral token
    price_feeds: Mapping<Address, Address>,
    /// Collateral deposited per (user, token)
    collateral_deposited: Mapping<(Address, Address), U256>,
    /// DSC minted per user
    dsc_minted: Mapping<Address, U256>,
    /// DSC token contract address
    dsc: Var<Address>,
}

#[odra::module]
impl DscEngine {
    /// Initialize the engine with parallel token / price feed lists.
    pub fn init(
        &mut self,
        token_addresses: Vec<Address>,
        price_feed_addresses: Vec<Address>,
        dsc_address: Address,
    ) {
        if token_addresses.len() != price_feed_addresses.len() {
            self.env()
                .revert(DscError::TokenAddressesAndPriceFeedAddressesMustBeSameLength);
        }

        for (token, feed) in token_addresses.iter().zip(price_feed_addresses.iter()) {
            if self.price_feeds.get(token).is_some() {
                self.env().revert(DscError::DuplicateCollateral);
            }
            if OracleLib::decimals(self.env(), *feed) != FEED_DECIMALS {
                self.env().revert(DscError::FeedDecimalsMismatch);
            }
            self.price_feeds.set(token, *feed);
        }

        self.collateral_tokens.set(token_addresses);
        self.dsc.set(dsc_address);
    }

    // ========== Collateral & Debt Operations ==========

    /// Deposit collateral and mint DSC in one call
    #[odra(non_reentrant)]
    pub fn deposit_collateral_and_mint_dsc(
        &mut self,
        token_collateral_address: Address,
        amount_collateral: U256,
        amount_dsc_to_mint: U256,
    ) {
        let result = self
            .deposit_collateral_internal(token_collateral_address, amount_collateral)
            .and_then(|_| self.mint_dsc_internal(amount_dsc_to_mint));
        self.or_revert(result)
    }

    /// Deposit collateral; the engine must be approved for `amount_collateral`
    #[odra(non_reentrant)]
    pub fn deposit_collateral(&mut self, token_collateral_address: Address, amount_collateral: U256) {
        let result = self.deposit_collateral_internal(token_collateral_address, amount_collateral);
        self.or_revert(result)
    }

    /// Burn DSC and redeem collateral in one call
    #[odra(non_reentrant)]
    pub fn redeem_collateral_for_dsc(
        &mut self,
        token_collateral_address: Address,
        amount_collateral: U256,
        amount_dsc_to_burn: U256,
    ) {
        // Burn first so the redeem health check sees the reduced debt.
        let result = self
            .burn_dsc_internal(amount_dsc_to_burn)
            .and_then(|_| self.redeem_collateral_internal(token_collateral_address, amount_collateral));
        self.or_revert(result)
    }

    /// Redeem collateral back to the caller
    #[odra(non_reentrant)]
    pub fn redeem_collateral(&mut self, token_collateral_address: Address, amount_collateral: U256) {
        let result = self.redeem_collateral_internal(token_collateral_address, amount_collateral);
        self.or_revert(result)
    }

    /// Mint DSC against deposited collateral
    #[odra(non_reentrant)]
    pub fn mint_dsc(&mut self, amount_dsc_to_mint: U256) {
        let result = self.mint_dsc_internal(amount_dsc_to_mint);
        self.or_revert(result)
    }

    /// Repay own debt; the engine must be approved for `amount`
    #[odra(non_reentrant)]
    pub fn burn_dsc(&mut self, amount: U256) {
        let result = self.burn_dsc_internal(amount);
        self.or_revert(result)
    }

    // ========== Liquidation ==========

    /// Liquidate an undercollateralized `user`.
    ///
    /// The caller repays `debt_to_cover` DSC of the user's debt (pulled from
    /// the caller, engine must be approved) and receives the equivalent
    /// amount of `collateral` plus a 10% bonus taken from the user's
    /// position. Sizing `debt_to_cover` is left to the caller.
    #[odra(non_reentrant)]
    pub fn liquidate(&mut self, collateral: Address, user: Address, debt_to_cover: U256) {
        let result = self.liquidate_internal(collateral, user, debt_to_cover);
        self.or_revert(result)
    }

    // ========== Account Queries ==========

    /// Health factor of `user` (`U256::MAX` without debt)
    pub fn get_health_factor(&self, user: Address) -> U256 {
        let result = self.health_factor(user);
        self.or_revert(result)
    }

    /// (total DSC minted, collateral value in USD)
    pub fn get_account_information(&self, user: Address) -> (U256, U256) {
        let result = self.account_information(user);
        let info = self.or_revert(result);
        (info.total_dsc_minted, info.collateral_value_in_usd)
    }

    /// USD value (18 decimals) of everything `user` deposited
    pub fn get_account_collateral_value(&self, user: Address) -> U256 {
        let result = self.account_collateral_value(user);
        self.or_revert(result)
    }

    /// Deposited amount of `token` for `user`
    pub fn get_collateral_balance_of_user(&self, user: Address, token: Address) -> U256 {
        self.collateral_deposited.get(&(user, token)).unwrap_or(U256::zero())
    }

    /// Outstanding DSC minted by `user`
    pub fn get_dsc_minted(&self, user: Address) -> U256 {
        self.dsc_minted.get(&user).unwrap_or(U256::zero())
    }

    /// USD value (18 decimals) of `amount` of `token` at the live price
    pub fn get_usd_value(&self, token: Address, amount: U256) -> U256 {
        let result = self.usd_value(token, amount);
        self.or_revert(result)
    }

    /// Amount of `token` worth `usd_amount_in_wei` at the live price
    pub fn get_token_amount_from_usd(&self, token: Address, usd_amount_in_wei: U256) -> U256 {
        let result = self.token_amount_from_usd(token, usd_amount_in_wei);
        self.or_revert(result)
    }

    /// Health factor for arbitrary debt / collateral value
    pub fn calculate_health_factor(&self, total_dsc_minted: U256, collateral_value_in_usd: U256) -> U256 {
        let result = math::calculate_health_factor(total_dsc_minted, collateral_value_in_usd);
        self.or_revert(result)
    }

    // ========== Protocol Queries ==========

    /// Accepted collateral tokens in registration order
    pub fn get_collateral_tokens(&self) -> Vec<Address> {
        self.collateral_tokens.get().unwrap_or_default()
    }

    pub fn get_collateral_token_price_feed(&self, token: Address) -> Option<Address> {
        self.price_feeds.get(&token)
    }

    pub fn get_dsc(&self) -> Option<Address> {
        self.dsc.get()
    }

    pub fn get_precision(&self) -> U256 {
        U256::from(PRECISION)
    }

    pub fn get_additional_feed_precision(&self) -> U256 {
        U256::from(ADDITIONAL_FEED_PRECISION)
    }

    pub fn get_liquidation_threshold(&self) -> U256 {
        U256::from(LIQUIDATION_THRESHOLD)
    }

    pub fn get_liquidation_bonus(&self) -> U256 {
        U256::from(LIQUIDATION_BONUS)
    }

    pub fn get_liquidation_precision(&self) -> U256 {
        U256::from(LIQUIDATION_PRECISION)
    }

    pub fn get_min_health_factor(&self) -> U256 {
        U256::from(MIN_HEALTH_FACTOR)
    }

    /// Price staleness timeout in milliseconds
    pub fn get_price_timeout(&self) -> u64 {
        OracleLib::timeout()
    }
}

impl DscEngine {
    fn or_revert<T>(&self, result: EngineResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    // ========== Operation internals ==========

    fn deposit_collateral_internal(&mut self, token: Address, amount: U256) -> EngineResult<()> {
        more_than_zero(amount)?;
        self.require_allowed_token(token)?;

        let user = self.env().caller();
        let mut collateral = Cep18TokenContractRef::new(self.env(), token);
        if collateral.balance_of(user) < amount {
            return Err(DscError::InsufficientBalance);
        }

        let deposited = self.get_collateral_balance_of_user(user, token);
        let new_deposited = deposited.checked_add(amount).ok_or(DscError::ArithmeticOverflow)?;
        self.collateral_deposited.set(&(user, token), new_deposited);
        self.env().emit_event(CollateralDeposited { user, token, amount });

        let engine = self.env().self_address();
        if !collateral.transfer_from(user, engine, amount) {
            return Err(DscError::TransferFailed);
        }
        Ok(())
    }

    fn mint_dsc_internal(&mut self, amount: U256) -> EngineResult<()> {
        more_than_zero(amount)?;

        let user = self.env().caller();
        let minted = self.get_dsc_minted(user);
        let new_minted = minted.checked_add(amount).ok_or(DscError::ArithmeticOverflow)?;
        self.dsc_minted.set(&user, new_minted);
        self.revert_if_health_factor_is_broken(user)?;
        self.env().emit_event(DscMinted { user, amount });

        let mut dsc = StableTokenContractRef::new(self.env(), self.dsc_address()?);
        if !dsc.mint(user, amount) {
            return Err(DscError::MintFailed);
        }
        Ok(())
    }

    fn redeem_collateral_internal(&mut self, token: Address, amount: U256) -> EngineResult<()> {
        more_than_zero(amount)?;
        self.require_allowed_token(token)?;

        let user = self.env().caller();
        self.redeem_collateral_from(token, amount, user, user)?;
        self.revert_if_health_factor_is_broken(user)
    }

    fn burn_dsc_internal(&mut self, amount: U256) -> EngineResult<()> {
        more_than_zero(amount)?;

        let user = self.env().caller();
        self.burn_dsc_from(amount, user, user)?;
        // Burning only lowers debt; kept as a safety net.
        self.revert_if_health_factor_is_broken(user)
    }

    fn liquidate_internal(&mut self, collateral: Address, user: Address, debt_to_cover: U256) -> EngineResult<()> {
        more_than_zero(debt_to_cover)?;
        self.require_allowed_token(collateral)?;

        let starting_health_factor = self.health_factor(user)?;
        if math::is_healthy(starting_health_factor) {
            return Err(DscError::HealthFactorOk);
        }

        let token_amount_from_debt_covered = self.token_amount_from_usd(collateral, debt_to_cover)?;
        let bonus_collateral = math::liquidation_bonus(token_amount_from_debt_covered)?;
        let total_collateral_to_redeem = token_amount_from_debt_covered
            .checked_add(bonus_collateral)
            .ok_or(DscError::ArithmeticOverflow)?;

        let liquidator = self.env().caller();
        self.redeem_collateral_from(collateral, total_collateral_to_redeem, user, liquidator)?;
        self.burn_dsc_from(debt_to_cover, user, liquidator)?;

        let ending_health_factor = self.health_factor(user)?;
        if ending_health_factor <= starting_health_factor {
            return Err(DscError::HealthFactorNotImproved);
        }
        self.revert_if_health_factor_is_broken(liquidator)?;

        self.env().emit_event(Liquidated {
            user,
            liquidator,
            token: collateral,
            debt_covered: debt_to_cover,
            collateral_seized: total_collateral_to_redeem,
        });
        Ok(())
    }

    // ========== Ledger primitives ==========

    /// Move `amount` of `from`'s position out of custody to `to`.
    fn redeem_collateral_from(
        &mut self,
        token: Address,
        amount: U256,
        from: Address,
        to: Address,
    ) -> EngineResult<()> {
        let deposited = self.get_collateral_balance_of_user(from, token);
        if deposited < amount {
            return Err(DscError::RedeemExceedsDeposit);
        }
        self.collateral_deposited.set(&(from, token), deposited - amount);
        self.env().emit_event(CollateralRedeemed {
            redeemed_from: from,
            redeemed_to: to,
            token,
            amount,
        });

        let mut collateral = Cep18TokenContractRef::new(self.env(), token);
        if !collateral.transfer(to, amount) {
            return Err(DscError::TransferFailed);
        }
        Ok(())
    }

    /// Repay `amount` of `on_behalf_of`'s debt with DSC pulled from `dsc_from`.
    fn burn_dsc_from(&mut self, amount: U256, on_behalf_of: Address, dsc_from: Address) -> EngineResult<()> {
        let minted = self.get_dsc_minted(on_behalf_of);
        if minted < amount {
            return Err(DscError::BurnExceedsDebt);
        }
        self.dsc_minted.set(&on_behalf_of, minted - amount);
        self.env().emit_event(DscBurned {
            on_behalf_of,
            dsc_from,
            amount,
        });

        let engine = self.env().self_address();
        let mut dsc = StableTokenContractRef::new(self.env(), self.dsc_address()?);
        if !dsc.transfer_from(dsc_from, engine, amount) {
            return Err(DscError::TransferFailed);
        }
        dsc.burn(amount);
        Ok(())
    }

    // ========== Health factor ==========

    fn revert_if_health_factor_is_broken(&self, user: Address) -> EngineResult<()> {
        let health_factor = self.health_factor(user)?;
        if !math::is_healthy(health_factor) {
            return Err(DscError::BrokenHealthFactor);
        }
        Ok(())
    }

    fn health_factor(&self, user: Address) -> EngineResult<U256> {
        // No debt means nothing to back; skip the price reads.
        if self.get_dsc_minted(user).is_zero() {
            return Ok(U256::MAX);
        }
        let info = self.account_information(user)?;
        math::calculate_health_factor(info.total_dsc_minted, info.collateral_value_in_usd)
    }

    fn account_information(&self, user: Address) -> EngineResult<AccountInformation> {
        Ok(AccountInformation {
            total_dsc_minted: self.get_dsc_minted(user),
            collateral_value_in_usd: self.account_collateral_value(user)?,
        })
    }

    fn account_collateral_value(&self, user: Address) -> EngineResult<U256> {
        let mut total = U256::zero();
        for token in self.get_collateral_tokens() {
            let amount = self.get_collateral_balance_of_user(user, token);
            let value = self.usd_value(token, amount)?;
            total = total.checked_add(value).ok_or(DscError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    // ========== Pricing ==========

    fn usd_value(&self, token: Address, amount: U256) -> EngineResult<U256> {
        let price = self.live_price(token)?;
        math::usd_value(amount, price)
    }

    fn token_amount_from_usd(&self, token: Address, usd_amount: U256) -> EngineResult<U256> {
        let price = self.live_price(token)?;
        math::token_amount_from_usd(usd_amount, price)
    }

    fn live_price(&self, token: Address) -> EngineResult<U256> {
        let feed = self.price_feeds.get(&token).ok_or(DscError::TokenNotAllowed)?;
        OracleLib::checked_price(self.env(), feed)
    }

    // ========== Guards ==========

    fn require_allowed_token(&self, token: Address) -> EngineResult<()> {
        if self.price_feeds.get(&token).is_none() {
            return Err(DscError::TokenNotAllowed);
        }
        Ok(())
    }

    fn dsc_address(&self) -> EngineResult<Address> {
        self.dsc.get().ok_or(DscError::NotInitialized)
    }
}

fn more_than_zero(amount: U256) -> EngineResult<()> {
    if amount.is_zero() {
        return Err(DscError::AmountMustBeMoreThanZero);
    }
    Ok(())
}
