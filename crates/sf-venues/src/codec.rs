//! Per-venue variation points.
//!
//! The streaming engine in [`crate::session`] is identical for every venue;
//! what differs is captured by a [`VenueCodec`] value: endpoint URL,
//! subscription envelope, ticker schema, and keep-alive payload. Prefer
//! adding a codec over subclassing the engine.

use sf_core::types::Venue;
use sf_core::ws::PingPayload;

/// One decoded ticker from a venue frame.
///
/// `symbol` is still venue-native; the session canonicalizes it.
/// `timestamp` is payload seconds since epoch, or `None` when the venue's
/// message carries no server time (the session stamps receipt time).
#[derive(Debug, Clone, PartialEq)]
pub struct TickerEvent {
    pub symbol: String,
    pub price: f64,
    pub timestamp: Option<f64>,
}

/// Venue-specific behavior of one WebSocket market data stream.
///
/// Implementations are stateless values; everything stateful lives in the
/// generic session.
pub trait VenueCodec: Send + Sync {
    /// Venue this codec speaks for.
    fn venue(&self) -> Venue;

    /// WebSocket endpoint URL.
    fn ws_url(&self) -> &'static str;

    /// Application-level keep-alive payload. `None` leaves keep-alive to the
    /// transport.
    fn ping_payload(&self) -> Option<PingPayload>;

    /// Venue-native spelling of a subscription symbol (e.g. `BTC_USDT` on
    /// MEXC, `BTC-USDT-SWAP` on OKX).
    fn native_symbol(&self, raw: &str) -> String;

    /// Subscription frames for an explicit symbol list. Most venues produce
    /// one frame per symbol; Gate batches the whole list into one frame.
    fn subscribe_frames(&self, symbols: &[String]) -> Vec<String>;

    /// The all-tickers subscription frame, for venues that have one.
    fn subscribe_all(&self) -> Option<String> {
        None
    }

    /// Decode one text frame into zero or more ticker events.
    ///
    /// Non-ticker frames (pongs, subscription acks) decode to an empty vec;
    /// malformed frames are logged by the implementation and likewise yield
    /// nothing — a bad frame never stops the stream.
    fn parse(&self, text: &str) -> Vec<TickerEvent>;
}
