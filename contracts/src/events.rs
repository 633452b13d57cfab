//! Events emitted by the DSC engine.

use odra::prelude::*;
use odra::casper_types::U256;

/// Collateral moved into custody for `user`
#[odra::event]
pub struct CollateralDeposited {
    pub user: Address,
    pub token: Address,
    pub amount: U256,
}

/// Collateral released from `redeemed_from`'s position to `redeemed_to`
#[odra::event]
pub struct CollateralRedeemed {
    pub redeemed_from: Address,
    pub redeemed_to: Address,
    pub token: Address,
    pub amount: U256,
}

/// DSC minted against `user`'s collateral
#[odra::event]
pub struct DscMinted {
    pub user: Address,
    pub amount: U256,
}

/// Debt of `on_behalf_of` repaid with DSC pulled from `dsc_from`
#[odra::event]
pub struct DscBurned {
    pub on_behalf_of: Address,
    pub dsc_from: Address,
    pub amount: U256,
}

/// Successful liquidation of `user` by `liquidator`
#[odra::event]
pub struct Liquidated {
    pub user: Address,
    pub liquidator: Address,
    pub token: Address,
    pub debt_covered: U256,
    pub collateral_seized: U256,
}
