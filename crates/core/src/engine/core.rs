use alloy::primitives::Address;
use tracing::{debug, error, info};

use crate::{
    custody::{Custody, atomic},
    error::{BidError, Error},
    store::AuctionStore,
    types::{
        action::{ClosedAuction, NewAuction},
        auction::{Auction, CollateralAuction, DebtAuction, SurplusAuction},
        params::Params,
        primitives::{Amount, Timestamp, escrow_address},
    },
    validation,
};

use super::settle;

/// One step's view of the auction module: the registry, custody and the
/// parameters in force for this step.
pub struct AuctionEngine<'a, S, C>
where
    S: AuctionStore + ?Sized,
    C: Custody + ?Sized,
{
    store: &'a mut S,
    custody: &'a mut C,
    params: &'a Params,
}

impl<'a, S, C> AuctionEngine<'a, S, C>
where
    S: AuctionStore + ?Sized,
    C: Custody + ?Sized,
{
    pub fn new(store: &'a mut S, custody: &'a mut C, params: &'a Params) -> Self {
        Self {
            store,
            custody,
            params,
        }
    }

    pub fn params(&self) -> &Params {
        self.params
    }

    pub fn auction(&self, id: u64) -> Option<Auction> {
        self.store.get(id)
    }

    /// Opens an auction and escrows the initiator's funds. Returns the new ID.
    /// Nothing is stored and no ID is used up if escrow fails.
    pub fn start_auction(&mut self, request: NewAuction, now: Timestamp) -> Result<u64, Error> {
        let id = self.store.next_id();
        let next_id = id.checked_add(1).ok_or(Error::IdsExhausted(id))?;
        let end_time = now.saturating_add(self.params.max_auction_duration);

        let auction: Auction = match request {
            NewAuction::Surplus {
                initiator,
                lot,
                bid_denom,
            } => SurplusAuction::new(id, initiator, lot, bid_denom, end_time).into(),
            NewAuction::Debt {
                initiator,
                bid,
                initial_lot,
                debt,
            } => DebtAuction::new(id, initiator, bid, initial_lot, end_time, debt).into(),
            NewAuction::Collateral {
                initiator,
                lot,
                max_bid,
                lot_returns,
                debt,
            } => CollateralAuction::new(id, initiator, lot, end_time, max_bid, lot_returns, debt)
                .into(),
        };
        auction.validate()?;

        let initiator = auction.base().initiator_address();
        let escrow = escrow_address();
        let deposits = auction.escrowed();
        atomic(&mut *self.custody, |journal| {
            for amount in &deposits {
                journal.send(initiator, escrow, amount)?;
            }
            Ok(())
        })?;

        self.store.set_next_id(next_id);
        let base = auction.base();
        info!(
            auction_id = id,
            kind = %auction.kind(),
            initiator = %base.initiator,
            lot = %base.lot,
            bid = %base.bid,
            end_time = %base.end_time,
            "auction started"
        );
        self.store.put(auction);

        Ok(id)
    }

    /// Replaces the leading bid. On any error the registry and custody are
    /// left exactly as they were.
    pub fn place_bid(
        &mut self,
        id: u64,
        bidder: Address,
        bid: Amount,
        lot: Amount,
        now: Timestamp,
    ) -> Result<(), Error> {
        let mut auction = self.store.get(id).ok_or(BidError::AuctionNotFound(id))?;
        let end_time = auction.base().end_time;
        if now >= end_time {
            return Err(BidError::AuctionExpired { id, end_time }.into());
        }

        if let Err(error) = validation::validate_bid(&auction, bidder, &bid, &lot, self.params) {
            debug!(auction_id = id, %bidder, %bid, %lot, %error, "bid rejected");
            return Err(error.into());
        }

        let escrow = escrow_address();
        let previous = auction.base();
        atomic(&mut *self.custody, |journal| {
            match previous.winner() {
                Some(leader) if leader == bidder => {
                    journal.send(bidder, escrow, &bid.saturating_sub(&previous.bid))?;
                }
                Some(leader) => {
                    journal.send(bidder, escrow, &bid)?;
                    journal.send(escrow, leader, &previous.bid)?;
                }
                None => journal.send(bidder, escrow, &bid)?,
            }
            Ok(())
        })?;

        let phase_before = auction.phase();
        let base = auction.base_mut();
        base.end_time = now
            .saturating_add(self.params.bid_duration)
            .min(base.max_end_time);
        base.has_received_bids = true;
        base.bidder = Some(bidder);
        base.bid = bid;
        base.lot = lot;

        info!(
            auction_id = id,
            kind = %auction.kind(),
            phase = %auction.phase(),
            %bidder,
            bid = %auction.base().bid,
            lot = %auction.base().lot,
            end_time = %auction.base().end_time,
            "bid placed"
        );
        if phase_before != auction.phase() {
            info!(auction_id = id, "collateral auction entered reverse phase");
        }
        self.store.put(auction);

        Ok(())
    }

    /// Settles an expired auction and removes it. An unknown ID is a no-op.
    /// A custody failure here is fatal: the auction's transfers are rolled
    /// back and the record stays, but the step must halt.
    pub fn close_auction(
        &mut self,
        id: u64,
        now: Timestamp,
    ) -> Result<Option<ClosedAuction>, Error> {
        let Some(auction) = self.store.get(id) else {
            return Ok(None);
        };
        let end_time = auction.base().end_time;
        if now < end_time {
            return Err(Error::AuctionNotExpired { id, end_time, now });
        }

        let settled = atomic(&mut *self.custody, |journal| {
            settle::settle(journal, &auction).map_err(|source| Error::Close { id, source })
        });
        let outcome = match settled {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(auction_id = id, kind = %auction.kind(), error = %err, "failed to close auction");
                return Err(err);
            }
        };

        self.store.delete(id);
        let base = auction.base();
        let closed = ClosedAuction {
            id,
            kind: auction.kind(),
            initiator: base.initiator.clone(),
            closed_at: now,
            outcome,
        };
        info!(
            auction_id = id,
            kind = %closed.kind,
            winner = ?base.winner(),
            "auction closed"
        );

        Ok(Some(closed))
    }

    /// Closes every auction whose end time has passed, lowest ID first. Stops
    /// at the first error; auctions closed before it stay closed, so running
    /// the sweep again only picks up what is left.
    pub fn end_block(&mut self, now: Timestamp) -> Result<Vec<ClosedAuction>, Error> {
        let expired: Vec<u64> = self
            .store
            .iter()
            .filter(|auction| auction.base().end_time <= now)
            .map(Auction::id)
            .collect();

        let mut closed = Vec::with_capacity(expired.len());
        for id in expired {
            if let Some(result) = self.close_auction(id, now)? {
                closed.push(result);
            }
        }

        if !closed.is_empty() {
            debug!(now = %now, closed = closed.len(), "end block sweep");
        }
        Ok(closed)
    }
}
