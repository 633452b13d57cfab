//! Fixed-point arithmetic for collateral valuation and solvency.
//!
//! All USD amounts and DSC amounts carry 18 decimals (`PRECISION`).
//! Aggregator feeds report 8 decimals, so every feed price is scaled up by
//! `ADDITIONAL_FEED_PRECISION` before it meets a token amount, and the product
//! is divided back down by `PRECISION`. The order matters: scaling down first
//! would truncate sub-dollar precision on every reading.
//!
//! Bounds: token amounts up to 2^96 and feed prices up to 2^64 keep every
//! intermediate product below 2^200, well inside `U256`.

use odra::casper_types::U256;
use crate::errors::DscError;

/// Engine precision (1e18)
pub const PRECISION: u64 = 1_000_000_000_000_000_000;

/// Scale from 8-decimal feed prices to `PRECISION` (1e10)
pub const ADDITIONAL_FEED_PRECISION: u64 = 10_000_000_000;

/// Decimals every registered price feed must report
pub const FEED_DECIMALS: u8 = 8;

/// Share of collateral value counted toward backing debt (50 = 200% overcollateralized)
pub const LIQUIDATION_THRESHOLD: u64 = 50;

/// Denominator for threshold and bonus percentages
pub const LIQUIDATION_PRECISION: u64 = 100;

/// Extra collateral paid to a liquidator, in percent of the covered amount
pub const LIQUIDATION_BONUS: u64 = 10;

/// Solvency cutoff, inclusive (1.0 scaled by 1e18)
pub const MIN_HEALTH_FACTOR: u64 = 1_000_000_000_000_000_000;

pub type MathResult<T> = Result<T, DscError>;

fn mul(a: U256, b: U256) -> MathResult<U256> {
    a.checked_mul(b).ok_or(DscError::ArithmeticOverflow)
}

fn div(a: U256, b: U256) -> MathResult<U256> {
    a.checked_div(b).ok_or(DscError::ArithmeticOverflow)
}

/// Convert a raw aggregator answer into an unsigned feed price.
pub fn feed_answer_to_price(answer: i64) -> MathResult<U256> {
    if answer <= 0 {
        return Err(DscError::InvalidPrice);
    }
    Ok(U256::from(answer as u64))
}

/// Scale an 8-decimal feed price to `PRECISION`.
pub fn scale_feed_price(feed_price: U256) -> MathResult<U256> {
    mul(feed_price, U256::from(ADDITIONAL_FEED_PRECISION))
}

/// USD value (18 decimals) of `amount` units of a collateral token.
///
/// `(feed_price * ADDITIONAL_FEED_PRECISION) * amount / PRECISION`
pub fn usd_value(amount: U256, feed_price: U256) -> MathResult<U256> {
    let scaled = scale_feed_price(feed_price)?;
    div(mul(scaled, amount)?, U256::from(PRECISION))
}

/// Collateral token amount worth `usd_amount` (18 decimals) at `feed_price`.
///
/// `usd_amount * PRECISION / (feed_price * ADDITIONAL_FEED_PRECISION)`
pub fn token_amount_from_usd(usd_amount: U256, feed_price: U256) -> MathResult<U256> {
    let scaled = scale_feed_price(feed_price)?;
    if scaled.is_zero() {
        return Err(DscError::InvalidPrice);
    }
    div(mul(usd_amount, U256::from(PRECISION))?, scaled)
}

/// Health factor of a position.
///
/// `U256::MAX` when nothing is minted, otherwise
/// `(collateral_value * LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION) * PRECISION / debt`.
pub fn calculate_health_factor(total_dsc_minted: U256, collateral_value_in_usd: U256) -> MathResult<U256> {
    if total_dsc_minted.is_zero() {
        return Ok(U256::MAX);
    }
    let adjusted = div(
        mul(collateral_value_in_usd, U256::from(LIQUIDATION_THRESHOLD))?,
        U256::from(LIQUIDATION_PRECISION),
    )?;
    div(mul(adjusted, U256::from(PRECISION))?, total_dsc_minted)
}

/// Bonus collateral owed to a liquidator for seizing `amount`.
pub fn liquidation_bonus(amount: U256) -> MathResult<U256> {
    div(mul(amount, U256::from(LIQUIDATION_BONUS))?, U256::from(LIQUIDATION_PRECISION))
}

/// Whether a health factor sits at or above the solvency cutoff.
pub fn is_healthy(health_factor: U256) -> bool {
    health_factor >= U256::from(MIN_HEALTH_FACTOR)
}
