//! Shared domain types.

pub mod market;
pub mod symbol;
pub mod venue;

pub use market::{PriceUpdate, SpreadOpportunity};
pub use venue::Venue;
