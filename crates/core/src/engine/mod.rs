pub mod core;
pub mod settle;

pub use self::core::AuctionEngine;
pub use settle::settle;
