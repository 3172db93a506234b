//! OKX swap adapter pieces.

pub mod json_parser;

use sf_core::types::Venue;
use sf_core::ws::PingPayload;

use crate::codec::{TickerEvent, VenueCodec};

const OKX_WS_URL: &str = "wss://ws.okx.com:8443/ws/v5/public";

/// OKX swap ticker codec.
pub struct OkxCodec;

impl VenueCodec for OkxCodec {
    fn venue(&self) -> Venue {
        Venue::Okx
    }

    fn ws_url(&self) -> &'static str {
        OKX_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Json(serde_json::json!({"op": "ping"})))
    }

    fn native_symbol(&self, raw: &str) -> String {
        to_okx_inst_id(raw)
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

/// Convert a symbol to an OKX swap instId (`BTCUSDT` → `BTC-USDT-SWAP`).
///
/// Symbols already carrying a hyphen (the catalog hands back full instIds)
/// are passed through unchanged. If no known quote suffix matches, the input
/// is returned as-is.
pub fn to_okx_inst_id(symbol: &str) -> String {
    let upper = symbol.to_ascii_uppercase();
    if upper.contains('-') {
        return upper;
    }
    const QUOTES: &[&str] = &["USDT", "USDC"];
    for quote in QUOTES {
        if let Some(base) = upper.strip_suffix(quote) {
            if !base.is_empty() {
                return format!("{base}-{quote}-SWAP");
            }
        }
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inst_id_conversion() {
        assert_eq!(to_okx_inst_id("BTCUSDT"), "BTC-USDT-SWAP");
        assert_eq!(to_okx_inst_id("ETHUSDC"), "ETH-USDC-SWAP");
        // Catalog instIds pass through.
        assert_eq!(to_okx_inst_id("BTC-USDT-SWAP"), "BTC-USDT-SWAP");
        assert_eq!(to_okx_inst_id("XMRBTC"), "XMRBTC");
    }
}
