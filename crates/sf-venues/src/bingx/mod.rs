//! BingX swap adapter pieces.

pub mod json_parser;

use sf_core::types::Venue;
use sf_core::ws::PingPayload;

use crate::codec::{TickerEvent, VenueCodec};

const BINGX_WS_URL: &str = "wss://open-api-swap.bingx.com/swap-market";

/// BingX swap last-price codec.
pub struct BingxCodec;

impl VenueCodec for BingxCodec {
    fn venue(&self) -> Venue {
        Venue::Bingx
    }

    fn ws_url(&self) -> &'static str {
        BINGX_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Json(serde_json::json!({"method": "ping"})))
    }

    fn native_symbol(&self, raw: &str) -> String {
        to_bingx_symbol(raw)
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

/// Convert a symbol to BingX swap format (`BTCUSDT` → `BTC-USDT`).
pub fn to_bingx_symbol(symbol: &str) -> String {
    let upper = symbol.to_ascii_uppercase().replace('_', "-");
    if upper.contains('-') {
        return upper;
    }
    if let Some(base) = upper.strip_suffix("USDT") {
        if !base.is_empty() {
            return format!("{base}-USDT");
        }
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_format() {
        assert_eq!(to_bingx_symbol("BTCUSDT"), "BTC-USDT");
        assert_eq!(to_bingx_symbol("BTC-USDT"), "BTC-USDT");
        assert_eq!(to_bingx_symbol("eth_usdt"), "ETH-USDT");
    }
}
