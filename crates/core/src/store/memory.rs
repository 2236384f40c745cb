use std::collections::BTreeMap;

use crate::types::auction::Auction;

use super::AuctionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    next_id: u64,
    auctions: BTreeMap<u64, Auction>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            auctions: BTreeMap::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }
}

impl AuctionStore for MemoryStore {
    fn next_id(&self) -> u64 {
        self.next_id
    }

    fn set_next_id(&mut self, id: u64) {
        self.next_id = id;
    }

    fn get(&self, id: u64) -> Option<Auction> {
        self.auctions.get(&id).cloned()
    }

    fn put(&mut self, auction: Auction) {
        self.auctions.insert(auction.id(), auction);
    }

    fn delete(&mut self, id: u64) {
        self.auctions.remove(&id);
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Auction> + '_> {
        Box::new(self.auctions.values())
    }
}
