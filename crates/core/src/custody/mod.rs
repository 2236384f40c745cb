pub mod journal;
pub mod memory;
pub mod traits;

pub use journal::{Journal, Movement, atomic};
pub use memory::MemoryCustody;
pub use traits::Custody;
