use std::collections::BTreeMap;

use alloy::primitives::Address;

use crate::{error::CustodyError, types::primitives::Amount};

use super::Custody;

/// Balance book kept in memory. Backs the tests and the CLI sweep simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCustody {
    balances: BTreeMap<(Address, String), u128>,
    supply: BTreeMap<String, u128>,
}

impl MemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `amount` into `account`. Test and simulation setup.
    pub fn fund(&mut self, account: Address, amount: &Amount) -> Result<(), CustodyError> {
        self.mint(account, amount)
    }

    pub fn supply(&self, denom: &str) -> u128 {
        self.supply.get(denom).copied().unwrap_or_default()
    }

    /// Non-zero balances in `(account, denom)` order.
    pub fn balances(&self) -> impl Iterator<Item = (Address, &str, u128)> + '_ {
        self.balances
            .iter()
            .map(|((account, denom), amount)| (*account, denom.as_str(), *amount))
    }

    fn credit(&mut self, account: Address, amount: &Amount) -> Result<(), CustodyError> {
        let key = (account, amount.denom().to_string());
        let current = self.balances.get(&key).copied().unwrap_or_default();
        let updated = current
            .checked_add(amount.amount())
            .ok_or_else(|| CustodyError::Overflow {
                account,
                denom: amount.denom().to_string(),
            })?;
        self.balances.insert(key, updated);
        Ok(())
    }

    fn debit(&mut self, account: Address, amount: &Amount) -> Result<(), CustodyError> {
        let key = (account, amount.denom().to_string());
        let available = self.balances.get(&key).copied().unwrap_or_default();
        let remaining =
            available
                .checked_sub(amount.amount())
                .ok_or_else(|| CustodyError::InsufficientFunds {
                    account,
                    denom: amount.denom().to_string(),
                    available,
                    required: amount.amount(),
                })?;
        if remaining == 0 {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, remaining);
        }
        Ok(())
    }
}

impl Custody for MemoryCustody {
    fn balance(&self, account: Address, denom: &str) -> u128 {
        self.balances
            .get(&(account, denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn holdings(&self, account: Address) -> Vec<Amount> {
        self.balances
            .range((account, String::new())..)
            .take_while(|((holder, _), _)| *holder == account)
            .map(|((_, denom), amount)| Amount::new(denom.as_str(), *amount))
            .collect()
    }

    fn send(&mut self, from: Address, to: Address, amount: &Amount) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        if from == to {
            let available = self.balance(from, amount.denom());
            if available < amount.amount() {
                return Err(CustodyError::InsufficientFunds {
                    account: from,
                    denom: amount.denom().to_string(),
                    available,
                    required: amount.amount(),
                });
            }
            return Ok(());
        }
        // credit side first so a failed send changes nothing
        if self
            .balance(to, amount.denom())
            .checked_add(amount.amount())
            .is_none()
        {
            return Err(CustodyError::Overflow {
                account: to,
                denom: amount.denom().to_string(),
            });
        }
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    fn mint(&mut self, to: Address, amount: &Amount) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        let supply = self
            .supply(amount.denom())
            .checked_add(amount.amount())
            .ok_or_else(|| CustodyError::Overflow {
                account: to,
                denom: amount.denom().to_string(),
            })?;
        self.credit(to, amount)?;
        self.supply.insert(amount.denom().to_string(), supply);
        Ok(())
    }

    fn burn(&mut self, from: Address, amount: &Amount) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.debit(from, amount)?;
        match self.supply(amount.denom()).saturating_sub(amount.amount()) {
            0 => self.supply.remove(amount.denom()),
            supply => self.supply.insert(amount.denom().to_string(), supply),
        };
        Ok(())
    }
}
