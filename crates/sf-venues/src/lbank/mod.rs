//! LBank adapter pieces.

pub mod json_parser;

use sf_core::types::Venue;
use sf_core::ws::PingPayload;

use crate::codec::{TickerEvent, VenueCodec};

const LBANK_WS_URL: &str = "wss://www.lbkex.net/ws/V2/";

/// LBank tick codec.
///
/// LBank is the one venue that timestamps with an ISO-8601 string instead of
/// epoch milliseconds; see [`json_parser::parse_lbank_time`].
pub struct LbankCodec;

impl VenueCodec for LbankCodec {
    fn venue(&self) -> Venue {
        Venue::Lbank
    }

    fn ws_url(&self) -> &'static str {
        LBANK_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Json(serde_json::json!({"action": "ping"})))
    }

    fn native_symbol(&self, raw: &str) -> String {
        // LBank pairs keep the underscore (`BTC_USDT`).
        raw.to_ascii_uppercase().replace('-', "_")
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
