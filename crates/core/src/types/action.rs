use alloy::primitives::Address;
use serde::Serialize;

use super::{
    auction::AuctionKind,
    primitives::{Amount, Timestamp},
    weighted::WeightedAddresses,
};

/// Request from a caller subsystem to open an auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewAuction {
    Surplus {
        initiator: String,
        lot: Amount,
        bid_denom: String,
    },
    Debt {
        initiator: String,
        bid: Amount,
        initial_lot: Amount,
        debt: Amount,
    },
    Collateral {
        initiator: String,
        lot: Amount,
        max_bid: Amount,
        lot_returns: WeightedAddresses,
        debt: Amount,
    },
}

impl NewAuction {
    pub fn kind(&self) -> AuctionKind {
        match self {
            NewAuction::Surplus { .. } => AuctionKind::Surplus,
            NewAuction::Debt { .. } => AuctionKind::Debt,
            NewAuction::Collateral { .. } => AuctionKind::Collateral,
        }
    }

    pub fn initiator(&self) -> &str {
        match self {
            NewAuction::Surplus { initiator, .. }
            | NewAuction::Debt { initiator, .. }
            | NewAuction::Collateral { initiator, .. } => initiator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedAuction {
    pub id: u64,
    pub kind: AuctionKind,
    pub initiator: String,
    pub closed_at: Timestamp,
    pub outcome: CloseOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CloseOutcome {
    /// Lot returned to the initiator. Debt left uncovered is reported, not
    /// re-auctioned; the owning subsystem decides whether to start again.
    NoBids {
        returned_lot: Option<Amount>,
        unresolved_debt: Option<Amount>,
    },
    Surplus {
        winner: Address,
        lot: Amount,
        burned: Amount,
    },
    Debt {
        winner: Address,
        minted: Amount,
        proceeds: Amount,
        settled_debt: Amount,
    },
    Collateral {
        winner: Address,
        lot: Amount,
        proceeds: Amount,
        returned_debt: Amount,
        lot_returns: Vec<(Address, Amount)>,
    },
}
