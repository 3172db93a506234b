//! Spread detection over the latest cross-venue prices.
//!
//! Purely event-driven: every incoming update re-scans only its own symbol,
//! O(venues) work per update. All adapters funnel through one lock, which is
//! released before alert callbacks run.

use std::sync::{Arc, Mutex, RwLock};

use ahash::AHashMap;
use sf_core::types::{PriceUpdate, SpreadOpportunity, Venue};

use crate::dedup::AlertDeduper;

/// Callback invoked for every opportunity that survives deduplication.
///
/// Runs on the thread of whichever adapter produced the triggering update;
/// keep it non-blocking.
pub type AlertCallback = Arc<dyn Fn(&SpreadOpportunity) + Send + Sync>;

struct DetectorState {
    /// Latest update per (venue, canonical symbol). Last writer wins.
    prices: AHashMap<(Venue, String), PriceUpdate>,
    deduper: AlertDeduper,
}

/// Keeps the latest price per (venue, symbol) and emits qualifying spreads.
pub struct SpreadDetector {
    min_spread_percent: f64,
    state: Mutex<DetectorState>,
    callbacks: RwLock<Vec<AlertCallback>>,
}

impl SpreadDetector {
    pub fn new(min_spread_percent: f64, deduper: AlertDeduper) -> Self {
        Self {
            min_spread_percent,
            state: Mutex::new(DetectorState {
                prices: AHashMap::new(),
                deduper,
            }),
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Register a consumer for deduplicated opportunities.
    pub fn register_alert_callback(&self, callback: AlertCallback) {
        self.callbacks.write().unwrap().push(callback);
    }

    /// Ingest one update and re-scan its symbol.
    pub fn on_price_update(&self, update: PriceUpdate) {
        let opportunity = {
            let mut state = self.state.lock().unwrap();
            let symbol = update.symbol.clone();
            state.prices.insert((update.venue, symbol.clone()), update);
            self.scan_symbol(&mut state, &symbol)
        };

        if let Some(opportunity) = opportunity {
            let callbacks = self.callbacks.read().unwrap();
            for callback in callbacks.iter() {
                callback(&opportunity);
            }
        }
    }

    /// Latest stored update for a (venue, symbol) pair.
    pub fn last_update(&self, venue: Venue, symbol: &str) -> Option<PriceUpdate> {
        self.state
            .lock()
            .unwrap()
            .prices
            .get(&(venue, symbol.to_string()))
            .cloned()
    }

    /// Best-pair scan for one symbol; returns the opportunity only if it
    /// qualifies *and* the deduper lets it through.
    fn scan_symbol(&self, state: &mut DetectorState, symbol: &str) -> Option<SpreadOpportunity> {
        let mut buy: Option<&PriceUpdate> = None;
        let mut sell: Option<&PriceUpdate> = None;

        for ((_, sym), update) in state.prices.iter() {
            if sym != symbol {
                continue;
            }
            // Strict comparisons keep the first-seen entry on ties.
            match buy {
                Some(best) if update.price >= best.price => {}
                _ => buy = Some(update),
            }
            match sell {
                Some(best) if update.price <= best.price => {}
                _ => sell = Some(update),
            }
        }

        let (buy, sell) = (buy?, sell?);
        // One venue holding both ends means there is nothing to arb —
        // this also covers the single-venue case.
        if buy.venue == sell.venue || sell.price <= buy.price {
            return None;
        }

        let spread_percent = (sell.price - buy.price) / buy.price * 100.0;
        if spread_percent < self.min_spread_percent {
            return None;
        }

        let opportunity = SpreadOpportunity {
            base_token: symbol.to_string(),
            buy_venue: buy.venue,
            buy_price: buy.price,
            sell_venue: sell.venue,
            sell_price: sell.price,
            spread_percent,
            timestamp: buy.timestamp.max(sell.timestamp),
        };

        state
            .deduper
            .should_notify(symbol, spread_percent)
            .then_some(opportunity)
    }
}
