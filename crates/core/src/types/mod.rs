pub mod action;
pub mod auction;
pub mod params;
pub mod primitives;
pub mod weighted;

pub use action::*;
pub use auction::*;
pub use params::*;
pub use primitives::*;
pub use weighted::*;
