//! Price and spread records flowing between adapters and the detector.

use std::fmt;

use crate::types::venue::Venue;

/// A normalized last-trade price from one venue.
///
/// Immutable after construction. `symbol` is always the canonical full pair
/// identifier (e.g. `BTCUSDT`), never the base alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub venue: Venue,
    /// Canonical symbol — uppercase, separator-free.
    pub symbol: String,
    /// Last-trade price, strictly positive.
    pub price: f64,
    /// Seconds since the Unix epoch — payload time, or receipt time when the
    /// venue's message carries none.
    pub timestamp: f64,
}

impl fmt::Display for PriceUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.venue, self.symbol, self.price)
    }
}

/// A qualifying spread between two venues for the same canonical symbol.
///
/// Invariants: `buy_venue != sell_venue`, `sell_price > buy_price`,
/// `spread_percent > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadOpportunity {
    pub base_token: String,
    pub buy_venue: Venue,
    pub buy_price: f64,
    pub sell_venue: Venue,
    pub sell_price: f64,
    /// `(sell − buy) / buy × 100`.
    pub spread_percent: f64,
    /// Max of the two underlying update timestamps.
    pub timestamp: f64,
}

impl fmt::Display for SpreadOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Spread opportunity: {} - buy on {} at {}, sell on {} at {}, spread: {:.2}%",
            self.base_token,
            self.buy_venue,
            self.buy_price,
            self.sell_venue,
            self.sell_price,
            self.spread_percent,
        )
    }
}
