//! Price feed staleness guard.
//!
//! Every price the engine uses passes through [`OracleLib`]. A reading is
//! unusable when the answer was carried over from an earlier round or when it
//! is older than [`PRICE_TIMEOUT_MILLIS`]. A feed that never answered reports
//! a zero answer, which price conversion rejects.
//! An unusable reading aborts the enclosing operation; there is no cached
//! fallback price, so a dead feed freezes every operation priced by it.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractEnv;
use crate::errors::DscError;
use crate::interfaces::PriceFeedContractRef;
use crate::math::feed_answer_to_price;
use crate::types::RoundData;

/// Maximum age of a usable reading (3 hours, block time is in milliseconds)
pub const PRICE_TIMEOUT_MILLIS: u64 = 3 * 60 * 60 * 1000;

/// Helper for guarded price feed queries
pub struct OracleLib;

impl OracleLib {
    /// Latest round of `feed`, rejected when stale.
    pub fn stale_checked_latest_round_data(
        env: Rc<ContractEnv>,
        feed: Address,
    ) -> Result<RoundData, DscError> {
        let now = env.get_block_time();
        let round = PriceFeedContractRef::new(env, feed).latest_round_data();
        Self::check_round(&round, now)?;
        Ok(round)
    }

    /// Latest usable feed price (feed decimals, unsigned).
    pub fn checked_price(env: Rc<ContractEnv>, feed: Address) -> Result<U256, DscError> {
        let round = Self::stale_checked_latest_round_data(env, feed)?;
        feed_answer_to_price(round.answer)
    }

    /// Decimals reported by `feed`.
    pub fn decimals(env: Rc<ContractEnv>, feed: Address) -> u8 {
        PriceFeedContractRef::new(env, feed).decimals()
    }

    /// Staleness timeout in milliseconds
    pub const fn timeout() -> u64 {
        PRICE_TIMEOUT_MILLIS
    }

    /// Freshness rules applied to a round observed at `now`.
    pub fn check_round(round: &RoundData, now: u64) -> Result<(), DscError> {
        if round.answered_in_round < round.round_id {
            return Err(DscError::StalePrice);
        }
        let age = now.saturating_sub(round.updated_at);
        if age > PRICE_TIMEOUT_MILLIS {
            return Err(DscError::StalePrice);
        }
        Ok(())
    }
}
