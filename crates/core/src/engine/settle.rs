use alloy::primitives::Address;

use crate::{
    custody::Custody,
    error::CustodyError,
    types::{
        action::CloseOutcome,
        auction::{Auction, CollateralAuction},
        primitives::{Amount, escrow_address},
    },
};

/// Pays out an expired auction from escrow. The caller owns rollback; on
/// error some of the transfers below may already have happened.
pub fn settle<C>(custody: &mut C, auction: &Auction) -> Result<CloseOutcome, CustodyError>
where
    C: Custody + ?Sized,
{
    let base = auction.base();
    let escrow = escrow_address();
    let initiator = base.initiator_address();

    let Some(winner) = base.winner() else {
        return return_unsold(custody, auction, initiator);
    };

    match auction {
        Auction::Surplus(_) => {
            custody.burn(escrow, &base.bid)?;
            custody.send(escrow, winner, &base.lot)?;

            Ok(CloseOutcome::Surplus {
                winner,
                lot: base.lot.clone(),
                burned: base.bid.clone(),
            })
        }
        Auction::Debt(debt) => {
            custody.mint(winner, &base.lot)?;
            custody.send(escrow, initiator, &base.bid)?;
            custody.send(escrow, initiator, &debt.corresponding_debt)?;

            Ok(CloseOutcome::Debt {
                winner,
                minted: base.lot.clone(),
                proceeds: base.bid.clone(),
                settled_debt: debt.corresponding_debt.clone(),
            })
        }
        Auction::Collateral(collateral) => {
            custody.send(escrow, initiator, &base.bid)?;
            custody.send(escrow, winner, &base.lot)?;
            custody.send(escrow, initiator, &collateral.corresponding_debt)?;
            let lot_returns = return_unsold_lot(custody, collateral)?;

            Ok(CloseOutcome::Collateral {
                winner,
                lot: base.lot.clone(),
                proceeds: base.bid.clone(),
                returned_debt: collateral.corresponding_debt.clone(),
                lot_returns,
            })
        }
    }
}

fn return_unsold<C>(
    custody: &mut C,
    auction: &Auction,
    initiator: Address,
) -> Result<CloseOutcome, CustodyError>
where
    C: Custody + ?Sized,
{
    let escrow = escrow_address();

    let (returned_lot, unresolved_debt) = match auction {
        Auction::Surplus(surplus) => (Some(surplus.base.lot.clone()), None),
        // a debt lot is only minted on a win, nothing to hand back
        Auction::Debt(debt) => (None, Some(debt.corresponding_debt.clone())),
        Auction::Collateral(collateral) => (
            Some(collateral.initial_lot.clone()),
            Some(collateral.corresponding_debt.clone()),
        ),
    };

    for amount in returned_lot.iter().chain(unresolved_debt.iter()) {
        custody.send(escrow, initiator, amount)?;
    }

    Ok(CloseOutcome::NoBids {
        returned_lot,
        unresolved_debt,
    })
}

/// Splits `initial_lot - lot` over the lot return addresses by weight.
fn return_unsold_lot<C>(
    custody: &mut C,
    collateral: &CollateralAuction,
) -> Result<Vec<(Address, Amount)>, CustodyError>
where
    C: Custody + ?Sized,
{
    let unsold = collateral.unsold_lot();
    if unsold.is_zero() {
        return Ok(Vec::new());
    }

    let escrow = escrow_address();
    let mut returned = Vec::new();
    for (address, share) in collateral.lot_returns.split(unsold.amount()) {
        if share == 0 {
            continue;
        }
        let amount = unsold.with_amount(share);
        custody.send(escrow, address, &amount)?;
        returned.push((address, amount));
    }
    Ok(returned)
}
