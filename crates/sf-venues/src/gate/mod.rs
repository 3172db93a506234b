//! Gate USDT-futures adapter pieces.

pub mod json_parser;

use sf_core::time_util;
use sf_core::types::Venue;
use sf_core::ws::PingPayload;

use crate::codec::{TickerEvent, VenueCodec};

const GATE_WS_URL: &str = "wss://fx-ws.gateio.ws/v4/ws/usdt";

/// Gate futures ticker codec.
///
/// Gate subscribes with a single frame carrying the full contract list in
/// its payload rather than one frame per contract.
pub struct GateCodec;

impl VenueCodec for GateCodec {
    fn venue(&self) -> Venue {
        Venue::Gate
    }

    fn ws_url(&self) -> &'static str {
        GATE_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Json(serde_json::json!({"method": "ping"})))
    }

    fn native_symbol(&self, raw: &str) -> String {
        // Gate contract names keep the underscore (`BTC_USDT`).
        raw.to_ascii_uppercase().replace('-', "_")
    }

    fn subscribe_frames(&self, symbols: &[String]) -> Vec<String> {
        if symbols.is_empty() {
            return Vec::new();
        }
        let contracts: Vec<String> = symbols.iter().map(|s| self.native_symbol(s)).collect();
        vec![json_parser::build_subscribe(
            &contracts,
            time_util::now_unix(),
        )]
    }

    fn parse(&self, text: &str) -> Vec<TickerEvent> {
        json_parser::parse_message(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_frame_for_the_whole_list() {
        let codec = GateCodec;
        let frames =
            codec.subscribe_frames(&["BTC_USDT".to_string(), "eth-usdt".to_string()]);
        assert_eq!(frames.len(), 1);

        let v: serde_json::Value = serde_json::from_str(&frames[0]).unwrap();
        assert_eq!(v["channel"], "futures.tickers");
        assert_eq!(v["event"], "subscribe");
        assert_eq!(v["payload"], serde_json::json!(["BTC_USDT", "ETH_USDT"]));
    }

    #[test]
    fn empty_list_sends_nothing() {
        assert!(GateCodec.subscribe_frames(&[]).is_empty());
    }
}
