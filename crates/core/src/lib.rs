pub mod custody;
pub mod engine;
pub mod error;
pub mod genesis;
pub mod math;
pub mod store;
pub mod types;
pub mod validation;

pub use custody::{Custody, Journal, MemoryCustody, Movement, atomic};
pub use engine::AuctionEngine;
pub use error::*;
pub use genesis::*;
pub use store::{AuctionStore, MemoryStore};
pub use types::*;
pub use validation::*;
