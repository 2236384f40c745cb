use alloy::primitives::Address;

use crate::{error::CustodyError, types::primitives::Amount};

/// Token custody the engine moves funds through. Implementations must leave
/// balances untouched when they return an error.
pub trait Custody {
    fn balance(&self, account: Address, denom: &str) -> u128;

    /// Every non-zero balance `account` holds, one entry per denom.
    fn holdings(&self, account: Address) -> Vec<Amount>;

    fn send(&mut self, from: Address, to: Address, amount: &Amount) -> Result<(), CustodyError>;

    fn mint(&mut self, to: Address, amount: &Amount) -> Result<(), CustodyError>;

    fn burn(&mut self, from: Address, amount: &Amount) -> Result<(), CustodyError>;
}
