use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{error::WeightError, math, types::primitives::u128_strings};

/// Addresses paired with payout weights, used to split an unsold remainder.
/// Addresses need not be unique; zero weights are allowed as long as the total
/// is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedAddresses {
    addresses: Vec<Address>,
    #[serde(with = "u128_strings")]
    weights: Vec<u128>,
}

impl WeightedAddresses {
    pub fn new(addresses: Vec<Address>, weights: Vec<u128>) -> Result<Self, WeightError> {
        let weighted = Self { addresses, weights };
        weighted.validate()?;
        Ok(weighted)
    }

    pub fn single(address: Address) -> Self {
        Self {
            addresses: vec![address],
            weights: vec![1],
        }
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn weights(&self) -> &[u128] {
        &self.weights
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        if self.weights.is_empty() {
            return Err(WeightError::Empty);
        }

        if self.addresses.len() != self.weights.len() {
            return Err(WeightError::LengthMismatch {
                addresses: self.addresses.len(),
                weights: self.weights.len(),
            });
        }

        if let Some(index) = self.addresses.iter().position(|address| address.is_zero()) {
            return Err(WeightError::ZeroAddress(index));
        }

        let total = self
            .weights
            .iter()
            .fold(U256::ZERO, |acc, weight| acc + U256::from(*weight));
        if total.is_zero() {
            return Err(WeightError::ZeroTotalWeight);
        }

        Ok(())
    }

    /// Splits `total` pro rata by weight. Shares are floored and whatever the
    /// flooring leaves over goes to the first address, so the shares always sum
    /// to exactly `total`.
    pub fn split(&self, total: u128) -> Vec<(Address, u128)> {
        let shares = math::split_weighted(total, &self.weights);
        self.addresses.iter().copied().zip(shares).collect()
    }
}
