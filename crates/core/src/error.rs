use alloy::primitives::Address;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::primitives::{Amount, Timestamp};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bid(#[from] BidError),

    #[error(transparent)]
    Custody(#[from] CustodyError),

    #[error(transparent)]
    Auction(#[from] AuctionError),

    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Genesis(#[from] GenesisError),

    #[error("auction {id} has not expired: ends at {end_time}, now {now}")]
    AuctionNotExpired {
        id: u64,
        end_time: Timestamp,
        now: Timestamp,
    },

    #[error("auction ids exhausted: next id {0} cannot be advanced")]
    IdsExhausted(u64),

    #[error("failed to settle auction {id}: {source}")]
    Close {
        id: u64,
        #[source]
        source: CustodyError,
    },

    #[error("custody rollback failed, balances are inconsistent: {0}")]
    RollbackFailed(#[source] CustodyError),
}

impl Error {
    /// Fatal errors must halt the current step; nothing has been skipped or
    /// partially applied for the auction involved, but the step cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Close { .. } | Error::RollbackFailed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("auction {0} not found")]
    AuctionNotFound(u64),

    #[error("auction {id} expired at {end_time}")]
    AuctionExpired { id: u64, end_time: Timestamp },

    #[error("bidder cannot be the zero address")]
    InvalidBidder,

    #[error("denom mismatch: expected {expected}, got {got}")]
    DenomMismatch { expected: String, got: String },

    #[error("bid is fixed at {expected} in this phase, got {got}")]
    BidMismatch { expected: Amount, got: Amount },

    #[error("lot is fixed at {expected} in this phase, got {got}")]
    LotMismatch { expected: Amount, got: Amount },

    #[error("bid does not improve enough on the previous one: required {required}, got {got}")]
    BidTooSmall { required: Amount, got: Amount },

    #[error("bid {got} exceeds the maximum bid {ceiling}")]
    BidExceedsCeiling { ceiling: Amount, got: Amount },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("insufficient funds: {account} holds {available}{denom}, needs {required}{denom}")]
    InsufficientFunds {
        account: Address,
        denom: String,
        available: u128,
        required: u128,
    },

    #[error("balance of {account} in {denom} would overflow")]
    Overflow { account: Address, denom: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuctionError {
    #[error("auction id cannot be zero")]
    ZeroId,

    #[error("auction initiator cannot be blank")]
    BlankInitiator,

    #[error("invalid {field}: {amount}")]
    InvalidAmount { field: &'static str, amount: Amount },

    #[error("bidder address cannot be the zero address")]
    ZeroBidder,

    #[error("auction has received bids but has no bidder")]
    MissingBidder,

    #[error("end time cannot be zero")]
    ZeroEndTime,

    #[error("max end time {max_end_time} is before end time {end_time}")]
    EndTimeAfterMax {
        end_time: Timestamp,
        max_end_time: Timestamp,
    },

    #[error("bid {bid} is not compatible with max bid {max_bid}")]
    BidAboveMax { bid: Amount, max_bid: Amount },

    #[error("lot {lot} is not compatible with initial lot {initial_lot}")]
    LotAboveInitial { lot: Amount, initial_lot: Amount },

    #[error("invalid lot returns: {0}")]
    LotReturns(#[from] WeightError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightError {
    #[error("must be at least 1 weighted address")]
    Empty,

    #[error("number of addresses doesn't match number of weights, {addresses} != {weights}")]
    LengthMismatch { addresses: usize, weights: usize },

    #[error("address {0} cannot be the zero address")]
    ZeroAddress(usize),

    #[error("total weight must be positive")]
    ZeroTotalWeight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("{name} increment cannot be negative: {value}")]
    NegativeIncrement { name: &'static str, value: Decimal },

    #[error("bid duration {bid_duration}s cannot be larger than max auction duration {max_auction_duration}s")]
    BidDurationTooLong {
        bid_duration: u64,
        max_auction_duration: u64,
    },
}

#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("failed to decode genesis: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),

    #[error("next auction id cannot be zero")]
    ZeroNextId,

    #[error("found invalid auction {id}: {source}")]
    InvalidAuction {
        id: u64,
        #[source]
        source: AuctionError,
    },

    #[error("found duplicate auction id ({0})")]
    DuplicateId(u64),

    #[error("found auction id >= the next auction id ({id} >= {next_id})")]
    IdNotBelowCounter { id: u64, next_id: u64 },

    #[error("escrowed {denom} overflows")]
    HoldingsOverflow { denom: String },

    #[error("escrow holds {actual}{denom} but no auction accounts for {denom}")]
    UnaccountedEscrow { denom: String, actual: u128 },

    #[error("escrow holds {actual}{denom} but auctions account for {expected}{denom}")]
    EscrowMismatch {
        denom: String,
        expected: u128,
        actual: u128,
    },
}
