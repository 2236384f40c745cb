use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    error::AuctionError,
    types::{
        primitives::{Amount, Timestamp, module_address},
        weighted::WeightedAddresses,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionKind {
    Surplus,
    Debt,
    Collateral,
}

impl AuctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionKind::Surplus => "surplus",
            AuctionKind::Debt => "debt",
            AuctionKind::Collateral => "collateral",
        }
    }
}

impl fmt::Display for AuctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward auctions raise the bid for a fixed lot; reverse auctions lower the
/// lot for a fixed bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionPhase {
    Forward,
    Reverse,
}

impl fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionPhase::Forward => f.write_str("forward"),
            AuctionPhase::Reverse => f.write_str("reverse"),
        }
    }
}

/// Fields shared by every auction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAuction {
    pub id: u64,
    /// Module that started the auction; pays out the lot and receives proceeds.
    pub initiator: String,
    pub lot: Amount,
    pub bidder: Option<Address>,
    pub bid: Amount,
    pub has_received_bids: bool,
    pub end_time: Timestamp,
    /// Bids extend `end_time` but never past this.
    pub max_end_time: Timestamp,
}

impl BaseAuction {
    fn new(
        id: u64,
        initiator: impl Into<String>,
        lot: Amount,
        bidder: Option<Address>,
        bid: Amount,
        end_time: Timestamp,
    ) -> Self {
        Self {
            id,
            initiator: initiator.into(),
            lot,
            bidder,
            bid,
            has_received_bids: false,
            end_time,
            max_end_time: end_time,
        }
    }

    pub fn validate(&self) -> Result<(), AuctionError> {
        if self.id == 0 {
            return Err(AuctionError::ZeroId);
        }
        if self.initiator.trim().is_empty() {
            return Err(AuctionError::BlankInitiator);
        }
        validate_amount("lot", &self.lot)?;
        validate_amount("bid", &self.bid)?;
        if self.bidder.is_some_and(|bidder| bidder.is_zero()) {
            return Err(AuctionError::ZeroBidder);
        }
        if self.has_received_bids && self.bidder.is_none() {
            return Err(AuctionError::MissingBidder);
        }
        if self.end_time.is_zero() || self.max_end_time.is_zero() {
            return Err(AuctionError::ZeroEndTime);
        }
        if self.end_time > self.max_end_time {
            return Err(AuctionError::EndTimeAfterMax {
                end_time: self.end_time,
                max_end_time: self.max_end_time,
            });
        }
        Ok(())
    }

    /// The leading bidder, if anyone has bid yet.
    pub fn winner(&self) -> Option<Address> {
        self.bidder.filter(|_| self.has_received_bids)
    }

    pub fn initiator_address(&self) -> Address {
        module_address(&self.initiator)
    }
}

fn validate_amount(field: &'static str, amount: &Amount) -> Result<(), AuctionError> {
    if amount.is_valid() {
        Ok(())
    } else {
        Err(AuctionError::InvalidAmount {
            field,
            amount: amount.clone(),
        })
    }
}

/// Forward auction whose winning bid is burned. Sells off surplus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusAuction {
    #[serde(rename = "base_auction")]
    pub base: BaseAuction,
}

impl SurplusAuction {
    pub fn new(
        id: u64,
        seller: impl Into<String>,
        lot: Amount,
        bid_denom: impl Into<String>,
        end_time: Timestamp,
    ) -> Self {
        Self {
            base: BaseAuction::new(id, seller, lot, None, Amount::zero(bid_denom), end_time),
        }
    }
}

/// Reverse auction that mints its lot to the winner to raise a fixed bid
/// covering `corresponding_debt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtAuction {
    #[serde(rename = "base_auction")]
    pub base: BaseAuction,
    pub corresponding_debt: Amount,
}

impl DebtAuction {
    pub fn new(
        id: u64,
        buyer: impl Into<String>,
        bid: Amount,
        initial_lot: Amount,
        end_time: Timestamp,
        debt: Amount,
    ) -> Self {
        let buyer = buyer.into();
        // The buyer's own module account stands in as bidder until the first bid.
        let bidder = Some(module_address(&buyer));
        Self {
            base: BaseAuction::new(id, buyer, initial_lot, bidder, bid, end_time),
            corresponding_debt: debt,
        }
    }

    pub fn validate(&self) -> Result<(), AuctionError> {
        validate_amount("corresponding debt", &self.corresponding_debt)?;
        self.base.validate()
    }
}

/// Two phase auction: forward up to `max_bid`, then reverse on the lot. Any
/// lot given up in the reverse phase goes back to `lot_returns` by weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralAuction {
    #[serde(rename = "base_auction")]
    pub base: BaseAuction,
    pub corresponding_debt: Amount,
    pub max_bid: Amount,
    /// Lot escrowed at start; `initial_lot - lot` is the unsold remainder.
    pub initial_lot: Amount,
    pub lot_returns: WeightedAddresses,
}

impl CollateralAuction {
    pub fn new(
        id: u64,
        seller: impl Into<String>,
        lot: Amount,
        end_time: Timestamp,
        max_bid: Amount,
        lot_returns: WeightedAddresses,
        debt: Amount,
    ) -> Self {
        let bid = Amount::zero(max_bid.denom());
        Self {
            base: BaseAuction::new(id, seller, lot.clone(), None, bid, end_time),
            corresponding_debt: debt,
            max_bid,
            initial_lot: lot,
            lot_returns,
        }
    }

    pub fn is_reverse_phase(&self) -> bool {
        self.base.bid == self.max_bid
    }

    pub fn phase(&self) -> AuctionPhase {
        if self.is_reverse_phase() {
            AuctionPhase::Reverse
        } else {
            AuctionPhase::Forward
        }
    }

    /// Lot given up by reverse-phase bids so far.
    pub fn unsold_lot(&self) -> Amount {
        self.initial_lot.saturating_sub(&self.base.lot)
    }

    pub fn validate(&self) -> Result<(), AuctionError> {
        validate_amount("corresponding debt", &self.corresponding_debt)?;
        validate_amount("max bid", &self.max_bid)?;
        validate_amount("initial lot", &self.initial_lot)?;
        self.lot_returns.validate()?;
        self.base.validate()?;

        if !self.base.bid.same_denom(&self.max_bid) || self.base.bid.amount() > self.max_bid.amount()
        {
            return Err(AuctionError::BidAboveMax {
                bid: self.base.bid.clone(),
                max_bid: self.max_bid.clone(),
            });
        }
        if !self.base.lot.same_denom(&self.initial_lot)
            || self.base.lot.amount() > self.initial_lot.amount()
        {
            return Err(AuctionError::LotAboveInitial {
                lot: self.base.lot.clone(),
                initial_lot: self.initial_lot.clone(),
            });
        }
        Ok(())
    }
}

/// A persisted auction, tagged by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Auction {
    Surplus(SurplusAuction),
    Debt(DebtAuction),
    Collateral(CollateralAuction),
}

impl Auction {
    pub fn base(&self) -> &BaseAuction {
        match self {
            Auction::Surplus(auction) => &auction.base,
            Auction::Debt(auction) => &auction.base,
            Auction::Collateral(auction) => &auction.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseAuction {
        match self {
            Auction::Surplus(auction) => &mut auction.base,
            Auction::Debt(auction) => &mut auction.base,
            Auction::Collateral(auction) => &mut auction.base,
        }
    }

    pub fn id(&self) -> u64 {
        self.base().id
    }

    pub fn kind(&self) -> AuctionKind {
        match self {
            Auction::Surplus(_) => AuctionKind::Surplus,
            Auction::Debt(_) => AuctionKind::Debt,
            Auction::Collateral(_) => AuctionKind::Collateral,
        }
    }

    pub fn phase(&self) -> AuctionPhase {
        match self {
            Auction::Surplus(_) => AuctionPhase::Forward,
            Auction::Debt(_) => AuctionPhase::Reverse,
            Auction::Collateral(auction) => auction.phase(),
        }
    }

    pub fn validate(&self) -> Result<(), AuctionError> {
        match self {
            Auction::Surplus(auction) => auction.base.validate(),
            Auction::Debt(auction) => auction.validate(),
            Auction::Collateral(auction) => auction.validate(),
        }
    }

    /// Balances the escrow account holds on behalf of this auction. Debt lots
    /// are minted at close and never escrowed; bids are escrowed once paid.
    pub fn escrowed(&self) -> Vec<Amount> {
        let base = self.base();
        let mut holdings = match self {
            Auction::Surplus(_) => vec![base.lot.clone()],
            Auction::Debt(auction) => vec![auction.corresponding_debt.clone()],
            Auction::Collateral(auction) => vec![
                auction.initial_lot.clone(),
                auction.corresponding_debt.clone(),
            ],
        };
        if base.has_received_bids {
            holdings.push(base.bid.clone());
        }
        holdings
    }
}

impl From<SurplusAuction> for Auction {
    fn from(auction: SurplusAuction) -> Self {
        Auction::Surplus(auction)
    }
}

impl From<DebtAuction> for Auction {
    fn from(auction: DebtAuction) -> Self {
        Auction::Debt(auction)
    }
}

impl From<CollateralAuction> for Auction {
    fn from(auction: CollateralAuction) -> Self {
        Auction::Collateral(auction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const END: Timestamp = Timestamp::new(1_000);

    fn collateral() -> CollateralAuction {
        CollateralAuction::new(
            1,
            "liquidator",
            Amount::new("coll", 100),
            END,
            Amount::new("pay", 50),
            WeightedAddresses::single(Address::repeat_byte(7)),
            Amount::new("debt", 50),
        )
    }

    #[test]
    fn new_auctions_validate() {
        let surplus = SurplusAuction::new(1, "cdp", Amount::new("usdx", 100), "ukava", END);
        let debt = DebtAuction::new(
            2,
            "cdp",
            Amount::new("usdx", 50),
            Amount::new("ukava", 1_000),
            END,
            Amount::new("debt", 50),
        );
        assert_eq!(Auction::from(surplus).validate(), Ok(()));
        assert_eq!(Auction::from(debt.clone()).validate(), Ok(()));
        assert_eq!(Auction::from(collateral()).validate(), Ok(()));
        assert_eq!(debt.base.bidder, Some(module_address("cdp")));
        assert_eq!(debt.base.winner(), None);
    }

    #[test]
    fn base_validation_errors() {
        let mut auction = Auction::from(collateral());
        auction.base_mut().id = 0;
        assert_eq!(auction.validate(), Err(AuctionError::ZeroId));

        let mut auction = Auction::from(collateral());
        auction.base_mut().initiator = "  ".into();
        assert_eq!(auction.validate(), Err(AuctionError::BlankInitiator));

        let mut auction = Auction::from(collateral());
        auction.base_mut().bidder = Some(Address::ZERO);
        assert_eq!(auction.validate(), Err(AuctionError::ZeroBidder));

        let mut auction = Auction::from(collateral());
        auction.base_mut().has_received_bids = true;
        auction.base_mut().bid = Amount::new("pay", 10);
        assert_eq!(auction.validate(), Err(AuctionError::MissingBidder));

        let mut auction = Auction::from(collateral());
        auction.base_mut().end_time = Timestamp::new(1_001);
        assert!(matches!(
            auction.validate(),
            Err(AuctionError::EndTimeAfterMax { .. })
        ));

        let mut auction = Auction::from(collateral());
        auction.base_mut().lot = Amount::new("", 100);
        assert!(matches!(
            auction.validate(),
            Err(AuctionError::InvalidAmount { field: "lot", .. })
        ));
    }

    #[test]
    fn collateral_phase_is_derived_from_bid() {
        let mut auction = collateral();
        assert_eq!(auction.phase(), AuctionPhase::Forward);
        auction.base.bid = Amount::new("pay", 49);
        assert_eq!(auction.phase(), AuctionPhase::Forward);
        auction.base.bid = Amount::new("pay", 50);
        assert_eq!(auction.phase(), AuctionPhase::Reverse);
        auction.base.lot = Amount::new("coll", 80);
        assert_eq!(auction.unsold_lot(), Amount::new("coll", 20));
    }

    #[test]
    fn collateral_rejects_bid_above_max_and_grown_lot() {
        let mut auction = collateral();
        auction.base.bid = Amount::new("pay", 51);
        assert!(matches!(
            auction.validate(),
            Err(AuctionError::BidAboveMax { .. })
        ));

        let mut auction = collateral();
        auction.base.lot = Amount::new("coll", 101);
        assert!(matches!(
            auction.validate(),
            Err(AuctionError::LotAboveInitial { .. })
        ));
    }

    #[test]
    fn serializes_with_type_tag() {
        let auction = Auction::from(SurplusAuction::new(
            3,
            "cdp",
            Amount::new("usdx", 100),
            "ukava",
            END,
        ));
        let json = serde_json::to_value(&auction).expect("serialize");
        assert_eq!(json["type"], "surplus");
        assert_eq!(json["value"]["base_auction"]["id"], 3);
        assert_eq!(json["value"]["base_auction"]["lot"]["amount"], "100");

        let back: Auction = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, auction);
    }

    #[test]
    fn escrowed_tracks_paid_bids() {
        let mut auction = Auction::from(collateral());
        assert_eq!(
            auction.escrowed(),
            vec![Amount::new("coll", 100), Amount::new("debt", 50)]
        );
        auction.base_mut().has_received_bids = true;
        auction.base_mut().bid = Amount::new("pay", 50);
        auction.base_mut().lot = Amount::new("coll", 90);
        assert_eq!(
            auction.escrowed(),
            vec![
                Amount::new("coll", 100),
                Amount::new("debt", 50),
                Amount::new("pay", 50)
            ]
        );
    }
}
