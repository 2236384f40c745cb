use alloy::primitives::Address;

use crate::{
    error::{CustodyError, Error},
    types::primitives::Amount,
};

use super::Custody;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Movement {
    Send {
        from: Address,
        to: Address,
        amount: Amount,
    },
    Mint {
        to: Address,
        amount: Amount,
    },
    Burn {
        from: Address,
        amount: Amount,
    },
}

/// Records every successful movement made through it so a multi-step
/// operation can be undone when a later step fails.
pub struct Journal<'a, C: Custody + ?Sized> {
    custody: &'a mut C,
    movements: Vec<Movement>,
}

impl<'a, C: Custody + ?Sized> Journal<'a, C> {
    pub fn new(custody: &'a mut C) -> Self {
        Self {
            custody,
            movements: Vec::new(),
        }
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Applies the inverse of each recorded movement, newest first.
    pub fn rollback(self) -> Result<(), CustodyError> {
        let Journal { custody, movements } = self;
        for movement in movements.into_iter().rev() {
            match movement {
                Movement::Send { from, to, amount } => custody.send(to, from, &amount)?,
                Movement::Mint { to, amount } => custody.burn(to, &amount)?,
                Movement::Burn { from, amount } => custody.mint(from, &amount)?,
            }
        }
        Ok(())
    }
}

impl<C: Custody + ?Sized> Custody for Journal<'_, C> {
    fn balance(&self, account: Address, denom: &str) -> u128 {
        self.custody.balance(account, denom)
    }

    fn holdings(&self, account: Address) -> Vec<Amount> {
        self.custody.holdings(account)
    }

    fn send(&mut self, from: Address, to: Address, amount: &Amount) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.custody.send(from, to, amount)?;
        self.movements.push(Movement::Send {
            from,
            to,
            amount: amount.clone(),
        });
        Ok(())
    }

    fn mint(&mut self, to: Address, amount: &Amount) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.custody.mint(to, amount)?;
        self.movements.push(Movement::Mint {
            to,
            amount: amount.clone(),
        });
        Ok(())
    }

    fn burn(&mut self, from: Address, amount: &Amount) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.custody.burn(from, amount)?;
        self.movements.push(Movement::Burn {
            from,
            amount: amount.clone(),
        });
        Ok(())
    }
}

/// Runs `op` against a fresh journal over `custody`. On error every movement
/// `op` made is reversed before the error is returned; a reversal that itself
/// fails surfaces as [`Error::RollbackFailed`].
pub fn atomic<C, T, F>(custody: &mut C, op: F) -> Result<T, Error>
where
    C: Custody + ?Sized,
    F: FnOnce(&mut Journal<'_, C>) -> Result<T, Error>,
{
    let mut journal = Journal::new(custody);
    match op(&mut journal) {
        Ok(value) => Ok(value),
        Err(error) => {
            journal.rollback().map_err(Error::RollbackFailed)?;
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::MemoryCustody;
    use pretty_assertions::assert_eq;

    fn alice() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xbb)
    }

    fn funded() -> MemoryCustody {
        let mut custody = MemoryCustody::new();
        custody.fund(alice(), &Amount::new("usdx", 100)).unwrap();
        custody
    }

    #[test]
    fn failed_operation_is_reversed() {
        let mut custody = funded();
        let before = custody.clone();

        let result = atomic(&mut custody, |journal| {
            journal.send(alice(), bob(), &Amount::new("usdx", 30))?;
            journal.mint(bob(), &Amount::new("ukava", 7))?;
            journal.burn(alice(), &Amount::new("usdx", 20))?;
            // alice only has 50 left
            journal.send(alice(), bob(), &Amount::new("usdx", 60))?;
            Ok(())
        });

        assert!(matches!(
            result,
            Err(Error::Custody(CustodyError::InsufficientFunds { .. }))
        ));
        assert_eq!(custody, before);
        assert_eq!(custody.supply("ukava"), 0);
    }

    #[test]
    fn successful_operation_is_kept() {
        let mut custody = funded();

        let moved = atomic(&mut custody, |journal| {
            journal.send(alice(), bob(), &Amount::new("usdx", 30))?;
            journal.send(alice(), bob(), &Amount::zero("usdx"))?;
            Ok(journal.movements().len())
        })
        .unwrap();

        assert_eq!(moved, 1);
        assert_eq!(custody.balance(bob(), "usdx"), 30);
    }
}
