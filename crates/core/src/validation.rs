use alloy::primitives::Address;
use rust_decimal::Decimal;

use crate::{
    error::BidError,
    math,
    types::{
        auction::{Auction, AuctionPhase, BaseAuction},
        params::Params,
        primitives::Amount,
    },
};

/// Checks whether `bidder` may replace the current best bid with `bid`/`lot`.
/// Expiry and lookup are the caller's job; this only looks at the record.
pub fn validate_bid(
    auction: &Auction,
    bidder: Address,
    bid: &Amount,
    lot: &Amount,
    params: &Params,
) -> Result<(), BidError> {
    if bidder.is_zero() {
        return Err(BidError::InvalidBidder);
    }

    let base = auction.base();
    ensure_denom(&base.bid, bid)?;
    ensure_denom(&base.lot, lot)?;

    match auction {
        Auction::Surplus(_) => {
            ensure_lot_unchanged(base, lot)?;
            validate_forward(base, bid, params.increment_surplus, None)
        }
        Auction::Debt(_) => {
            ensure_bid_unchanged(base, bid)?;
            validate_reverse(base, lot, params.increment_debt)
        }
        Auction::Collateral(collateral) => match collateral.phase() {
            AuctionPhase::Forward => {
                ensure_lot_unchanged(base, lot)?;
                validate_forward(
                    base,
                    bid,
                    params.increment_collateral,
                    Some(&collateral.max_bid),
                )
            }
            AuctionPhase::Reverse => {
                ensure_bid_unchanged(base, bid)?;
                validate_reverse(base, lot, params.increment_collateral)
            }
        },
    }
}

/// Lowest bid a forward auction accepts next. The first bid only has to be
/// non-zero and match the starting bid; later ones must clear the increment.
/// With a ceiling the requirement is capped so the ceiling stays reachable.
pub fn min_next_bid(base: &BaseAuction, increment: Decimal, ceiling: Option<&Amount>) -> Amount {
    let current = base.bid.amount();
    let required = if base.has_received_bids {
        current.saturating_add(math::min_increment(current, increment))
    } else {
        current.max(1)
    };
    let required = match ceiling {
        Some(ceiling) => required.min(ceiling.amount()),
        None => required,
    };
    base.bid.with_amount(required)
}

/// Highest lot a reverse auction accepts next, or `None` when the lot cannot
/// be lowered any further.
pub fn max_next_lot(base: &BaseAuction, increment: Decimal) -> Option<Amount> {
    let current = base.lot.amount();
    let allowed = if base.has_received_bids {
        current.checked_sub(math::min_increment(current, increment))?
    } else {
        current
    };
    Some(base.lot.with_amount(allowed))
}

fn validate_forward(
    base: &BaseAuction,
    bid: &Amount,
    increment: Decimal,
    ceiling: Option<&Amount>,
) -> Result<(), BidError> {
    if let Some(ceiling) = ceiling {
        if bid.amount() > ceiling.amount() {
            return Err(BidError::BidExceedsCeiling {
                ceiling: ceiling.clone(),
                got: bid.clone(),
            });
        }
    }

    let required = min_next_bid(base, increment, ceiling);
    if bid.amount() < required.amount() {
        return Err(BidError::BidTooSmall {
            required,
            got: bid.clone(),
        });
    }

    Ok(())
}

fn validate_reverse(base: &BaseAuction, lot: &Amount, increment: Decimal) -> Result<(), BidError> {
    match max_next_lot(base, increment) {
        Some(allowed) if lot.amount() <= allowed.amount() => Ok(()),
        allowed => Err(BidError::BidTooSmall {
            required: allowed.unwrap_or_else(|| base.lot.with_amount(0)),
            got: lot.clone(),
        }),
    }
}

fn ensure_denom(expected: &Amount, got: &Amount) -> Result<(), BidError> {
    if expected.same_denom(got) {
        Ok(())
    } else {
        Err(BidError::DenomMismatch {
            expected: expected.denom().to_string(),
            got: got.denom().to_string(),
        })
    }
}

fn ensure_lot_unchanged(base: &BaseAuction, lot: &Amount) -> Result<(), BidError> {
    if base.lot == *lot {
        Ok(())
    } else {
        Err(BidError::LotMismatch {
            expected: base.lot.clone(),
            got: lot.clone(),
        })
    }
}

fn ensure_bid_unchanged(base: &BaseAuction, bid: &Amount) -> Result<(), BidError> {
    if base.bid == *bid {
        Ok(())
    } else {
        Err(BidError::BidMismatch {
            expected: base.bid.clone(),
            got: bid.clone(),
        })
    }
}
