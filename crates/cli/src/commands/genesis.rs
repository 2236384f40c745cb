use std::{collections::BTreeMap, fmt, fs, path::Path};

use alloy::primitives::Address;
use auctioneer_core::{
    Amount, AuctionEngine, AuctionKind, ClosedAuction, Error, GenesisState, MemoryCustody,
    MemoryStore, Timestamp, escrow_address, export_genesis, init_genesis,
};
use eyre::WrapErr;
use serde::Serialize;

pub fn load_genesis(path: &Path) -> eyre::Result<GenesisState> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read genesis at {}", path.display()))?;
    let state = GenesisState::from_json(&raw)
        .wrap_err_with(|| format!("failed to load genesis at {}", path.display()))?;
    state
        .validate()
        .wrap_err_with(|| format!("invalid genesis at {}", path.display()))?;
    Ok(state)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenesisSummary {
    pub next_auction_id: u64,
    pub auctions: BTreeMap<&'static str, usize>,
    pub escrow: BTreeMap<String, u128>,
}

pub fn summarize(state: &GenesisState) -> Result<GenesisSummary, Error> {
    let mut auctions = BTreeMap::new();
    for kind in [AuctionKind::Surplus, AuctionKind::Debt, AuctionKind::Collateral] {
        auctions.insert(kind.as_str(), 0);
    }
    for auction in &state.auctions {
        *auctions.entry(auction.kind().as_str()).or_default() += 1;
    }

    Ok(GenesisSummary {
        next_auction_id: state.next_auction_id,
        auctions,
        escrow: state.escrow_holdings()?,
    })
}

impl fmt::Display for GenesisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "next auction id: {}", self.next_auction_id)?;
        for (kind, count) in &self.auctions {
            writeln!(f, "{kind} auctions: {count}")?;
        }
        write!(f, "escrow:")?;
        if self.escrow.is_empty() {
            write!(f, " empty")?;
        }
        for (denom, amount) in &self.escrow {
            write!(f, "\n  {amount}{denom}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub account: Address,
    pub balance: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub closed: Vec<ClosedAuction>,
    /// Balances paid out of escrow by the sweep.
    pub payouts: Vec<Payout>,
    pub genesis: GenesisState,
}

/// Imports `state` into an in-memory registry whose escrow holds exactly what
/// the snapshot accounts for, then runs one end-of-block sweep at `now`.
pub fn sweep(state: GenesisState, now: Timestamp) -> Result<SweepReport, Error> {
    let escrow = escrow_address();
    let mut custody = MemoryCustody::new();
    for (denom, amount) in state.escrow_holdings()? {
        custody.fund(escrow, &Amount::new(denom, amount))?;
    }

    let mut store = MemoryStore::new();
    let params = init_genesis(&mut store, &custody, state)?;
    let closed = AuctionEngine::new(&mut store, &mut custody, &params).end_block(now)?;

    let payouts = custody
        .balances()
        .filter(|(account, _, _)| *account != escrow)
        .map(|(account, denom, amount)| Payout {
            account,
            balance: Amount::new(denom, amount),
        })
        .collect();

    Ok(SweepReport {
        closed,
        payouts,
        genesis: export_genesis(&store, &params),
    })
}
