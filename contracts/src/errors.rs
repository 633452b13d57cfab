//! Protocol error definitions.

use odra::prelude::*;

/// DSC engine errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DscError {
    // Input validation errors (1xx)
    AmountMustBeMoreThanZero = 100,
    TokenNotAllowed = 101,
    TokenAddressesAndPriceFeedAddressesMustBeSameLength = 102,
    DuplicateCollateral = 103,

    // Insufficient resource errors (2xx)
    InsufficientBalance = 200,
    RedeemExceedsDeposit = 201,
    BurnExceedsDebt = 202,

    // External call errors (3xx)
    TransferFailed = 300,
    MintFailed = 301,

    // Health factor errors (4xx)
    BrokenHealthFactor = 400,
    HealthFactorOk = 401,
    HealthFactorNotImproved = 402,

    // Oracle errors (5xx)
    StalePrice = 500,
    InvalidPrice = 501,
    FeedDecimalsMismatch = 502,

    // Math errors (6xx)
    ArithmeticOverflow = 600,

    // Token errors (7xx)
    Unauthorized = 700,
    InsufficientTokenBalance = 701,
    InsufficientAllowance = 702,

    // Configuration errors (9xx)
    NotInitialized = 900,
}

impl DscError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Input validation
            DscError::AmountMustBeMoreThanZero => "Amount must be more than zero",
            DscError::TokenNotAllowed => "Collateral token not allowed",
            DscError::TokenAddressesAndPriceFeedAddressesMustBeSameLength => {
                "Token addresses and price feed addresses must be same length"
            }
            DscError::DuplicateCollateral => "Collateral token registered twice",

            // Insufficient resource
            DscError::InsufficientBalance => "Insufficient collateral token balance",
            DscError::RedeemExceedsDeposit => "Redeem amount exceeds deposited collateral",
            DscError::BurnExceedsDebt => "Burn amount exceeds minted DSC",

            // External call
            DscError::TransferFailed => "Token transfer failed",
            DscError::MintFailed => "DSC mint failed",

            // Health factor
            DscError::BrokenHealthFactor => "Health factor below minimum",
            DscError::HealthFactorOk => "Health factor is ok, nothing to liquidate",
            DscError::HealthFactorNotImproved => "Liquidation did not improve health factor",

            // Oracle
            DscError::StalePrice => "Price feed reading is stale",
            DscError::InvalidPrice => "Price feed answer is not positive",
            DscError::FeedDecimalsMismatch => "Price feed decimals mismatch",

            // Math
            DscError::ArithmeticOverflow => "Arithmetic overflow",

            // Token
            DscError::Unauthorized => "Unauthorized: caller is not owner",
            DscError::InsufficientTokenBalance => "Insufficient token balance",
            DscError::InsufficientAllowance => "Insufficient allowance",

            // Config
            DscError::NotInitialized => "Contract not initialized",
        }
    }
}

impl core::fmt::Display for DscError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<DscError> for OdraError {
    fn from(error: DscError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
