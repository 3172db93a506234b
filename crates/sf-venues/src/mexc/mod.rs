//! MEXC perpetual futures adapter pieces.
//!
//! MEXC doubles as the quote venue: [`MexcListingProbe`] gates alerts on a
//! contract actually existing there. It is also the only venue with an
//! all-tickers channel, so it runs without a startup catalog.

pub mod json_parser;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use sf_core::types::Venue;
use sf_core::ws::PingPayload;
use tracing::error;

use crate::ListingProbe;
use crate::codec::{TickerEvent, VenueCodec};

const MEXC_WS_URL: &str = "wss://contract.mexc.com/edge";
const MEXC_CONTRACT_TICKER_URL: &str = "https://contract.mexc.com/api/v1/contract/ticker";

/// MEXC contract stream codec.
pub struct MexcCodec;

impl VenueCodec for MexcCodec {
    fn venue(&self) -> Venue {
        Venue::Mexc
    }

    fn ws_url(&self) -> &'static str {
        MEXC_WS_URL
    }

    fn ping_payload(&self) -> Option<PingPayload> {
        Some(PingPayload::Json(serde_json::json!({"method": "ping"})))
    }

    fn native_symbol(&self, raw: &str) -> String {
        to_mexc_contract(raw)
    }

    fn subscribe_frames(&self, symbols: &[String]) -> Vec<String> {
        symbols
            .iter()
            .map(|s| json_parser::build_subscribe(&self.native_symbol(s)))
            .collect()
    }

    fn subscribe_all(&self) -> Option<String> {
        Some(json_parser::build_subscribe_all())
    }

    fn parse(&self, text: &str) -> Vec<TickerEvent> {
        json_parser::parse_message(text)
    }
}

/// Convert a symbol to MEXC contract format (`BTCUSDT` → `BTC_USDT`).
///
/// Symbols already carrying a separator are passed through (normalized to
/// `_`); anything else gets the underscore re-inserted before `USDT`.
pub fn to_mexc_contract(symbol: &str) -> String {
    let upper = symbol.to_ascii_uppercase().replace('-', "_");
    if upper.contains('_') {
        return upper;
    }
    if let Some(base) = upper.strip_suffix("USDT") {
        if !base.is_empty() {
            return format!("{base}_USDT");
        }
    }
    upper
}

/// Answers whether a contract trades on MEXC.
pub struct MexcListingProbe {
    client: reqwest::Client,
}

impl MexcListingProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for MexcListingProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingProbe for MexcListingProbe {
    async fn is_listed(&self, symbol: &str) -> bool {
        match fetch_contract_ticker(&self.client, symbol).await {
            Ok(listed) => listed,
            Err(e) => {
                error!("mexc listing check for {symbol} failed: {e}");
                false
            }
        }
    }
}

async fn fetch_contract_ticker(client: &reqwest::Client, symbol: &str) -> Result<bool> {
    let contract = to_mexc_contract(symbol);
    let response = client
        .get(MEXC_CONTRACT_TICKER_URL)
        .query(&[("symbol", contract.as_str())])
        .send()
        .await?;
    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }
    let body: Value = response.json().await?;
    Ok(is_listed_response(&body))
}

/// MEXC answers `success: true` with a data payload for live contracts.
fn is_listed_response(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true)
        && body.get("data").is_some_and(|d| !d.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contract_format() {
        assert_eq!(to_mexc_contract("BTCUSDT"), "BTC_USDT");
        assert_eq!(to_mexc_contract("BTC_USDT"), "BTC_USDT");
        assert_eq!(to_mexc_contract("btc-usdt"), "BTC_USDT");
        assert_eq!(to_mexc_contract("BTCUSD"), "BTCUSD");
    }

    #[test]
    fn listing_response_shapes() {
        assert!(is_listed_response(
            &json!({"success": true, "code": 0, "data": {"symbol": "BTC_USDT"}})
        ));
        assert!(!is_listed_response(&json!({"success": true, "data": null})));
        assert!(!is_listed_response(
            &json!({"success": false, "code": 1002, "message": "contract not exists"})
        ));
    }
}
