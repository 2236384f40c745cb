use crate::types::auction::Auction;

/// Keyed auction registry plus the ID counter. IDs start at 1 and are never
/// handed out twice.
pub trait AuctionStore {
    fn next_id(&self) -> u64;

    fn set_next_id(&mut self, id: u64);

    fn get(&self, id: u64) -> Option<Auction>;

    fn put(&mut self, auction: Auction);

    fn delete(&mut self, id: u64);

    /// All stored auctions in ascending ID order.
    fn iter(&self) -> Box<dyn Iterator<Item = &Auction> + '_>;
}
