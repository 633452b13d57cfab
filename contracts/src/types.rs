//! Common types used across the DSC protocol.

use odra::prelude::*;
use odra::casper_types::U256;

/// Aggregator round as reported by a price feed.
///
/// Timestamps are Casper block times (milliseconds).
#[odra::odra_type]
#[derive(Copy)]
pub struct RoundData {
    /// Round identifier
    pub round_id: u64,
    /// Price answer with the feed's decimals
    pub answer: i64,
    /// Time the round started
    pub started_at: u64,
    /// Time the answer was last updated
    pub updated_at: u64,
    /// Round in which the answer was computed
    pub answered_in_round: u64,
}

/// Per-account summary returned by the engine read surface
#[odra::odra_type]
pub struct AccountInformation {
    /// Outstanding DSC minted by the account
    pub total_dsc_minted: U256,
    /// USD value (18 decimals) of all deposited collateral
    pub collateral_value_in_usd: U256,
}
