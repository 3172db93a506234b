//! # sf-venues
//!
//! Exchange adapters for the spreadfeed system.
//!
//! ## Architecture
//!
//! Each venue provides a [`codec::VenueCodec`] value describing its variation
//! points (WebSocket URL, subscription envelope, ticker schema, ping payload).
//! The generic [`session::StreamingAdapter`] engine drives the WebSocket
//! session, decodes frames through the codec, normalizes symbols, and fans
//! normalized [`PriceUpdate`]s out to registered callbacks.
//!
//! ## Shared infrastructure
//!
//! - [`codec`] — per-venue variation points + `TickerEvent`
//! - [`session`] — generic streaming adapter engine
//! - [`catalog`] — startup symbol discovery over HTTP
//! - [`wallet`] — deposit/withdraw status probes
//! - [`json_util`] — JSON field extraction helpers
//! - [`registry`] — venue tag → adapter factory

pub mod bingx;
pub mod bitget;
pub mod bybit;
pub mod catalog;
pub mod codec;
pub mod gate;
pub mod json_util;
pub mod lbank;
pub mod mexc;
pub mod okx;
pub mod registry;
pub mod session;
pub mod wallet;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sf_core::types::{PriceUpdate, Venue};
use sf_core::ws::SessionState;

/// Callback invoked for every normalized price update an adapter produces.
///
/// Callbacks run on the adapter's session task and must not block.
pub type PriceCallback = Arc<dyn Fn(PriceUpdate) + Send + Sync>;

/// Capability set every exchange adapter implements.
///
/// Adapters are accessed concurrently by the orchestrator and their own
/// session task, hence `Send + Sync` and `&self` methods throughout.
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    /// Venue this adapter streams.
    fn venue(&self) -> Venue;

    /// Register a callback invoked for every normalized price update.
    fn register_price_callback(&self, callback: PriceCallback);

    /// Cache the symbol list used for (re-)subscription. `None` means the
    /// venue's all-tickers channel.
    async fn set_symbols(&self, symbols: Option<Vec<String>>);

    /// Open the WebSocket session and start streaming.
    async fn connect(&self) -> Result<()>;

    /// Send subscriptions for the given venue-native symbols; `None` requests
    /// the venue's all-tickers channel where one exists.
    async fn subscribe(&self, symbols: Option<Vec<String>>) -> Result<()>;

    /// Close the session. Idempotent.
    async fn close(&self);

    /// `(deposit_open, withdraw_open)` for a canonical symbol. Conservative
    /// `(false, false)` on any failure.
    async fn deposit_withdraw_status(&self, symbol: &str) -> (bool, bool);

    /// Current session state.
    async fn state(&self) -> SessionState;

    /// Canonical symbols currently subscribed.
    fn available_pairs(&self) -> HashSet<String>;

    /// Latest price seen for a canonical symbol, if any.
    fn last_price(&self, symbol: &str) -> Option<f64>;
}

/// Probe answering whether a symbol is actually tradable on a venue.
///
/// Used to gate alerts on listings of the quote venue; see
/// [`mexc::MexcListingProbe`].
#[async_trait]
pub trait ListingProbe: Send + Sync {
    async fn is_listed(&self, symbol: &str) -> bool;
}
