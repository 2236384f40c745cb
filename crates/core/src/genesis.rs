use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    custody::Custody,
    error::GenesisError,
    store::AuctionStore,
    types::{
        auction::Auction,
        params::Params,
        primitives::escrow_address,
    },
};

pub const DEFAULT_NEXT_AUCTION_ID: u64 = 1;

/// Snapshot of the auction module: counter, parameters and every open auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub next_auction_id: u64,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub auctions: Vec<Auction>,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            next_auction_id: DEFAULT_NEXT_AUCTION_ID,
            params: Params::default(),
            auctions: Vec::new(),
        }
    }
}

impl GenesisState {
    pub fn new(next_auction_id: u64, params: Params, auctions: Vec<Auction>) -> Self {
        Self {
            next_auction_id,
            params,
            auctions,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, GenesisError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, GenesisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), GenesisError> {
        self.params.validate()?;
        if self.next_auction_id == 0 {
            return Err(GenesisError::ZeroNextId);
        }

        let mut seen = BTreeSet::new();
        for auction in &self.auctions {
            let id = auction.id();
            auction
                .validate()
                .map_err(|source| GenesisError::InvalidAuction { id, source })?;

            if !seen.insert(id) {
                return Err(GenesisError::DuplicateId(id));
            }
            if id >= self.next_auction_id {
                return Err(GenesisError::IdNotBelowCounter {
                    id,
                    next_id: self.next_auction_id,
                });
            }
        }

        Ok(())
    }

    /// Total the escrow account must hold per denom to back these auctions.
    pub fn escrow_holdings(&self) -> Result<BTreeMap<String, u128>, GenesisError> {
        let mut holdings: BTreeMap<String, u128> = BTreeMap::new();
        for amount in self.auctions.iter().flat_map(Auction::escrowed) {
            let total = holdings.entry(amount.denom().to_string()).or_default();
            *total = total
                .checked_add(amount.amount())
                .ok_or_else(|| GenesisError::HoldingsOverflow {
                    denom: amount.denom().to_string(),
                })?;
        }
        Ok(holdings)
    }
}

/// Loads a snapshot into an empty registry. The escrow account must already
/// hold exactly what the snapshot's auctions account for, and nothing in any
/// other denom. Returns the params
/// to run with.
pub fn init_genesis<S, C>(
    store: &mut S,
    custody: &C,
    state: GenesisState,
) -> Result<Params, GenesisError>
where
    S: AuctionStore + ?Sized,
    C: Custody + ?Sized,
{
    state.validate()?;

    let escrow = escrow_address();
    let expected_holdings = state.escrow_holdings()?;
    for held in custody.holdings(escrow) {
        if !expected_holdings.contains_key(held.denom()) {
            return Err(GenesisError::UnaccountedEscrow {
                denom: held.denom().to_string(),
                actual: held.amount(),
            });
        }
    }
    for (denom, expected) in expected_holdings {
        let actual = custody.balance(escrow, &denom);
        if actual != expected {
            return Err(GenesisError::EscrowMismatch {
                denom,
                expected,
                actual,
            });
        }
    }

    let GenesisState {
        next_auction_id,
        params,
        auctions,
    } = state;

    let count = auctions.len();
    store.set_next_id(next_auction_id);
    for auction in auctions {
        store.put(auction);
    }
    info!(next_auction_id, auctions = count, "genesis loaded");

    Ok(params)
}

pub fn export_genesis<S>(store: &S, params: &Params) -> GenesisState
where
    S: AuctionStore + ?Sized,
{
    GenesisState {
        next_auction_id: store.next_id(),
        params: params.clone(),
        auctions: store.iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        custody::MemoryCustody,
        error::AuctionError,
        store::MemoryStore,
        types::{
            auction::{DebtAuction, SurplusAuction},
            primitives::{Amount, Timestamp},
        },
    };
    use pretty_assertions::assert_eq;

    const END: Timestamp = Timestamp::new(500);

    fn surplus(id: u64) -> Auction {
        SurplusAuction::new(id, "cdp", Amount::new("usdx", 100), "ukava", END).into()
    }

    fn debt(id: u64) -> Auction {
        DebtAuction::new(
            id,
            "cdp",
            Amount::new("usdx", 40),
            Amount::new("ukava", 1_000),
            END,
            Amount::new("debt", 40),
        )
        .into()
    }

    #[test]
    fn default_genesis_is_valid() {
        let state = GenesisState::default();
        assert!(state.validate().is_ok());
        assert_eq!(state.next_auction_id, 1);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let state = GenesisState::new(5, Params::default(), vec![surplus(1), surplus(1)]);
        assert!(matches!(
            state.validate(),
            Err(GenesisError::DuplicateId(1))
        ));
    }

    #[test]
    fn rejects_id_at_or_above_counter() {
        let state = GenesisState::new(3, Params::default(), vec![surplus(1), surplus(3)]);
        assert!(matches!(
            state.validate(),
            Err(GenesisError::IdNotBelowCounter { id: 3, next_id: 3 })
        ));
    }

    #[test]
    fn rejects_invalid_records_and_params() {
        let mut broken = surplus(1);
        broken.base_mut().initiator.clear();
        let state = GenesisState::new(2, Params::default(), vec![broken]);
        assert!(matches!(
            state.validate(),
            Err(GenesisError::InvalidAuction { id: 1, .. })
        ));

        let params = Params {
            bid_duration: 10,
            max_auction_duration: 5,
            ..Params::default()
        };
        let state = GenesisState::new(1, params, Vec::new());
        assert!(matches!(state.validate(), Err(GenesisError::Params(_))));

        let state = GenesisState::new(0, Params::default(), Vec::new());
        assert!(matches!(state.validate(), Err(GenesisError::ZeroNextId)));
    }

    #[test]
    fn holdings_sum_per_denom() {
        let state = GenesisState::new(4, Params::default(), vec![surplus(1), surplus(2), debt(3)]);
        let holdings = state.escrow_holdings().unwrap();
        assert_eq!(holdings.get("usdx"), Some(&200));
        assert_eq!(holdings.get("debt"), Some(&40));
        assert_eq!(holdings.get("ukava"), None);
    }

    #[test]
    fn init_requires_matching_escrow() {
        let state = GenesisState::new(3, Params::default(), vec![surplus(1), debt(2)]);
        let mut store = MemoryStore::new();
        let mut custody = MemoryCustody::new();
        custody
            .fund(escrow_address(), &Amount::new("usdx", 100))
            .unwrap();

        let err = init_genesis(&mut store, &custody, state.clone()).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::EscrowMismatch { ref denom, expected: 40, actual: 0 } if denom == "debt"
        ));
        assert!(store.is_empty());

        custody
            .fund(escrow_address(), &Amount::new("debt", 40))
            .unwrap();
        let params = init_genesis(&mut store, &custody, state.clone()).unwrap();
        assert_eq!(params, Params::default());
        assert_eq!(export_genesis(&store, &params), state);
    }

    #[test]
    fn init_rejects_escrow_in_unaccounted_denom() {
        let state = GenesisState::new(2, Params::default(), vec![surplus(1)]);
        let mut store = MemoryStore::new();
        let mut custody = MemoryCustody::new();
        custody
            .fund(escrow_address(), &Amount::new("usdx", 100))
            .unwrap();
        custody
            .fund(escrow_address(), &Amount::new("hard", 3))
            .unwrap();

        let err = init_genesis(&mut store, &custody, state).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::UnaccountedEscrow { ref denom, actual: 3 } if denom == "hard"
        ));
        assert!(store.is_empty());

        let err = init_genesis(&mut store, &custody, GenesisState::default()).unwrap_err();
        assert!(matches!(err, GenesisError::UnaccountedEscrow { .. }));
    }

    #[test]
    fn rejects_bids_without_a_bidder() {
        let mut orphaned = surplus(1);
        let base = orphaned.base_mut();
        base.has_received_bids = true;
        base.bid = Amount::new("ukava", 40);
        base.bidder = None;
        let state = GenesisState::new(2, Params::default(), vec![orphaned]);

        let mut store = MemoryStore::new();
        let mut custody = MemoryCustody::new();
        custody
            .fund(escrow_address(), &Amount::new("usdx", 100))
            .unwrap();
        custody
            .fund(escrow_address(), &Amount::new("ukava", 40))
            .unwrap();

        let err = init_genesis(&mut store, &custody, state).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::InvalidAuction {
                id: 1,
                source: AuctionError::MissingBidder
            }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn json_roundtrip_keeps_layout() {
        let state = GenesisState::new(2, Params::default(), vec![surplus(1)]);
        let json = state.to_json_pretty().unwrap();
        assert!(json.contains(r#""type": "surplus""#));
        assert_eq!(GenesisState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn decode_errors_are_reported() {
        assert!(matches!(
            GenesisState::from_json("{"),
            Err(GenesisError::Decode(_))
        ));
    }
}
