//! Bybit linear-perpetual adapter pieces.

pub mod json_parser;

use sf_core::types::Venue;
use sf_core::types::symbol::canonicalize;
use sf_core::ws::PingPayload;

use crate::codec::{TickerEvent, VenueCodec};

const BYBIT_WS_URL: &str = "wss://stream.bybit.com/v5/public/linear";

/// Bybit linear ticker codec.
///
/// Bybit messages carry no server timestamp; events leave `timestamp`
/// unset and the session stamps receipt time. Expect up to ~RTT of skew
/// against venues that do send server time.
pub struct BybitCodec;

impl VenueCodec for BybitCodec {
    fn venue(&self) -> Venue {
        Venue::Bybit
    }

    fn ws_url(&self) -> &'static str {
        BYBIT_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Json(serde_json::json!({"op": "ping"})))
    }

    fn native_symbol(&self, raw: &str) -> String {
        canonicalize(raw)
    }

    fn subscribe_frames(&self, symbols: &[String]) -> Vec<String> {
        symbols
            .iter()
            .map(|s| json_parser::build_subscribe(&self.native_symbol(s)))
            .collect()
    }

    fn parse(&self, text: &str) -> Vec<TickerEvent> {
        json_parser::parse_message(text)
    }
}
