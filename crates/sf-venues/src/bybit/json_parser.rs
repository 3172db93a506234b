//! Bybit JSON message parser.
//!
//! Ticker pushes carry a single object under `data`:
//!
//! ```json
//! {"topic":"tickers.BTCUSDT","type":"snapshot","data":{"symbol":"BTCUSDT","lastPrice":"30000.5"}}
//! ```
//!
//! Delta frames may omit `lastPrice` entirely; those are skipped without
//! noise — only the fields that changed are re-sent.

use serde_json::Value;
use tracing::error;

use crate::codec::TickerEvent;
use crate::json_util::parse_str_f64;

/// Parse one Bybit frame into ticker events.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[BYBIT] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Everything interesting arrives on a `tickers.<SYMBOL>` topic;
    // op-responses (pong, subscribe acks) have no topic.
    let is_ticker = v
        .get("topic")
        .and_then(Value::as_str)
        .is_some_and(|t| t.starts_with("tickers."));
    if !is_ticker {
        return Vec::new();
    }

    let Some(data) = v.get("data") else {
        return Vec::new();
    };
    let Some(symbol) = data.get("symbol").and_then(Value::as_str) else {
        error!("[BYBIT] ticker without symbol: {data}");
        return Vec::new();
    };
    // Absent in delta frames.
    let Some(price) = parse_str_f64(data.get("lastPrice")) else {
        return Vec::new();
    };

    vec![TickerEvent {
        symbol: symbol.to_string(),
        price,
        // Bybit sends no server time; the session stamps receipt time.
        timestamp: None,
    }]
}

/// Subscription frame for one linear contract.
pub fn build_subscribe(symbol: &str) -> String {
    serde_json::json!({"op": "subscribe", "args": [format!("tickers.{symbol}")]}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_snapshot() {
        let json = r#"{
            "topic": "tickers.BTCUSDT",
            "type": "snapshot",
            "data": {"symbol": "BTCUSDT", "lastPrice": "30000.5", "bid1Price": "30000.4"}
        }"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "BTCUSDT");
        assert_eq!(events[0].price, 30000.5);
        assert_eq!(events[0].timestamp, None);
    }

    #[test]
    fn delta_without_last_price_is_skipped() {
        let json = r#"{
            "topic": "tickers.BTCUSDT",
            "type": "delta",
            "data": {"symbol": "BTCUSDT", "openInterest": "1234"}
        }"#;
        assert!(parse_message(json).is_empty());
    }

    #[test]
    fn op_responses_yield_nothing() {
        assert!(parse_message(r#"{"op":"pong","success":true}"#).is_empty());
        assert!(parse_message(r#"{"op":"subscribe","success":true}"#).is_empty());
    }

    #[test]
    fn subscribe_frame() {
        let frame: Value = serde_json::from_str(&build_subscribe("BTCUSDT")).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({"op": "subscribe", "args": ["tickers.BTCUSDT"]})
        );
    }
}
