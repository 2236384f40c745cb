pub mod genesis;
pub mod governance;
pub mod params;
