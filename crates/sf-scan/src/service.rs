//! Orchestration: adapters in, enriched alerts out.
//!
//! [`SpreadService`] owns the adapter set, wires every adapter's price
//! callback into the shared detector, and drives the start/stop lifecycle.
//! Surviving alerts are enriched asynchronously (listing probe, per-venue
//! deposit/withdraw status) so no HTTP ever runs on an adapter's decode
//! path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::join_all;
use sf_core::config::AppConfig;
use sf_core::types::{SpreadOpportunity, Venue};
use sf_venues::mexc::MexcListingProbe;
use sf_venues::{ListingProbe, PriceCallback, VenueAdapter, catalog};
use tracing::{debug, error, info, warn};

use crate::dedup::{AlertDeduper, IgnoreList};
use crate::detector::{AlertCallback, SpreadDetector};

/// Main service orchestrating adapters, detector, and alert enrichment.
pub struct SpreadService {
    exchanges: Mutex<HashMap<Venue, Arc<dyn VenueAdapter>>>,
    detector: Arc<SpreadDetector>,
    listing_probe: Option<Arc<dyn ListingProbe>>,
    http: reqwest::Client,
    running: AtomicBool,
}

impl SpreadService {
    /// Assemble a service from explicit parts (tests use this directly).
    pub fn new(
        detector: Arc<SpreadDetector>,
        listing_probe: Option<Arc<dyn ListingProbe>>,
    ) -> Self {
        Self {
            exchanges: Mutex::new(HashMap::new()),
            detector,
            listing_probe,
            http: reqwest::Client::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Assemble a service from config: thresholds, ignore-list, probe.
    pub fn from_config(config: &AppConfig) -> Self {
        let ignore = IgnoreList::load(&config.ignore_tokens_path);
        let deduper = AlertDeduper::new(config.min_spread_change_percent, ignore);
        let detector = Arc::new(SpreadDetector::new(config.min_spread_percent, deduper));
        let listing_probe = config
            .require_mexc_listing
            .then(|| Arc::new(MexcListingProbe::new()) as Arc<dyn ListingProbe>);
        Self::new(detector, listing_probe)
    }

    /// The shared detector (for registering extra alert consumers).
    pub fn detector(&self) -> &Arc<SpreadDetector> {
        &self.detector
    }

    /// Number of registered exchanges.
    pub fn exchange_count(&self) -> usize {
        self.exchanges.lock().unwrap().len()
    }

    /// Register an adapter under its venue and wire it into the detector.
    ///
    /// Duplicates are rejected with a warning.
    pub fn add_exchange(&self, adapter: Arc<dyn VenueAdapter>) {
        let venue = adapter.venue();
        let mut exchanges = self.exchanges.lock().unwrap();
        if exchanges.contains_key(&venue) {
            warn!("exchange {venue} already registered");
            return;
        }

        let detector = self.detector.clone();
        let callback: PriceCallback = Arc::new(move |update| detector.on_price_update(update));
        adapter.register_price_callback(callback);
        exchanges.insert(venue, adapter);
    }

    /// Fetch catalogs, connect all adapters, subscribe each with its slice.
    ///
    /// Errors are logged; a failing adapter keeps retrying inside its own
    /// session and never holds its peers up.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        self.install_alert_reporter();

        let catalog = catalog::fetch_all(&self.http).await;
        let adapters: Vec<Arc<dyn VenueAdapter>> =
            self.exchanges.lock().unwrap().values().cloned().collect();

        join_all(adapters.iter().map(|adapter| async move {
            if let Err(e) = adapter.connect().await {
                error!("{} connect failed: {e}", adapter.venue());
            }
        }))
        .await;

        join_all(adapters.iter().map(|adapter| {
            let symbols = catalog.get(&adapter.venue()).cloned().flatten();
            async move {
                adapter.set_symbols(symbols.clone()).await;
                if let Err(e) = adapter.subscribe(symbols).await {
                    error!("{} subscribe failed: {e}", adapter.venue());
                }
            }
        }))
        .await;

        info!("spread service started with {} exchange(s)", adapters.len());
    }

    /// Close every adapter. Safe to call repeatedly.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let adapters: Vec<Arc<dyn VenueAdapter>> =
            self.exchanges.lock().unwrap().values().cloned().collect();
        join_all(adapters.iter().map(|adapter| adapter.close())).await;
        info!("spread service stopped");
    }

    /// Register the default alert consumer: probe the quote venue listing,
    /// gather both venues' wallet status, and log the report — all on a
    /// spawned task, off the adapter thread.
    fn install_alert_reporter(&self) {
        let exchanges: HashMap<Venue, Arc<dyn VenueAdapter>> =
            self.exchanges.lock().unwrap().clone();
        let probe = self.listing_probe.clone();

        let callback: AlertCallback = Arc::new(move |opportunity| {
            let opportunity = opportunity.clone();
            let exchanges = exchanges.clone();
            let probe = probe.clone();
            tokio::spawn(async move {
                report_opportunity(opportunity, &exchanges, probe.as_deref()).await;
            });
        });
        self.detector.register_alert_callback(callback);
    }
}

async fn report_opportunity(
    opportunity: SpreadOpportunity,
    exchanges: &HashMap<Venue, Arc<dyn VenueAdapter>>,
    probe: Option<&dyn ListingProbe>,
) {
    if let Some(probe) = probe {
        if !probe.is_listed(&opportunity.base_token).await {
            debug!(
                "{} not listed on the quote venue, alert dropped",
                opportunity.base_token
            );
            return;
        }
    }

    let buy_status = venue_status(exchanges, opportunity.buy_venue, &opportunity.base_token).await;
    let sell_status =
        venue_status(exchanges, opportunity.sell_venue, &opportunity.base_token).await;

    warn!(
        "Spread for {}: {:.2}%\nBuy: {} @ {} (Deposit: {}, Withdraw: {})\nSell: {} @ {} (Deposit: {}, Withdraw: {})",
        opportunity.base_token,
        opportunity.spread_percent,
        opportunity.buy_venue,
        opportunity.buy_price,
        open_closed(buy_status.0),
        open_closed(buy_status.1),
        opportunity.sell_venue,
        opportunity.sell_price,
        open_closed(sell_status.0),
        open_closed(sell_status.1),
    );
}

async fn venue_status(
    exchanges: &HashMap<Venue, Arc<dyn VenueAdapter>>,
    venue: Venue,
    symbol: &str,
) -> (bool, bool) {
    match exchanges.get(&venue) {
        Some(adapter) => adapter.deposit_withdraw_status(symbol).await,
        None => (false, false),
    }
}

fn open_closed(open: bool) -> &'static str {
    if open { "OPEN" } else { "CLOSED" }
}
