//! Bitget USDT-futures adapter pieces.

pub mod json_parser;

use sf_core::types::Venue;
use sf_core::types::symbol::canonicalize;
use sf_core::ws::PingPayload;

use crate::codec::{TickerEvent, VenueCodec};

const BITGET_WS_URL: &str = "wss://ws.bitget.com/v2/ws/public";

/// Bitget USDT-futures ticker codec.
///
/// Bitget instIds are already separator-free (`BTCUSDT`), so the native form
/// is the canonical form. Keep-alive is the literal `ping` text frame.
pub struct BitgetCodec;

impl VenueCodec for BitgetCodec {
    fn venue(&self) -> Venue {
        Venue::Bitget
    }

    fn ws_url(&self) -> &'static str {
        BITGET_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Text("ping".into()))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_symbol_strips_catalog_separators() {
        // The catalog assembles `{baseCoin}_{quoteCoin}`; the stream wants
        // the joined form.
        let codec = BitgetCodec;
        assert_eq!(codec.native_symbol("BTC_USDT"), "BTCUSDT");
        assert_eq!(codec.native_symbol("eth_usdt"), "ETHUSDT");
    }
}
