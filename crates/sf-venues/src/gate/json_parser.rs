//! Gate JSON message parser.
//!
//! Ticker updates arrive on the `futures.tickers` channel with a shared
//! millisecond timestamp:
//!
//! ```json
//! {"time_ms":1672515782136,"channel":"futures.tickers","event":"update",
//!  "result":[{"contract":"BTC_USDT","last":"30000.5"}]}
//! ```

use serde_json::Value;
use tracing::error;

use crate::codec::TickerEvent;
use crate::json_util::{parse_str_f64, parse_ts_ms};

/// Parse one Gate frame into ticker events.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[GATE] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Subscription acks and `futures.pong` frames fall through here.
    let is_update = v.get("event").and_then(Value::as_str) == Some("update")
        && v.get("channel").and_then(Value::as_str) == Some("futures.tickers");
    if !is_update {
        return Vec::new();
    }

    let Some(result) = v.get("result").and_then(Value::as_array) else {
        return Vec::new();
    };
    let timestamp = parse_ts_ms(v.get("time_ms"));

    let mut events = Vec::with_capacity(result.len());
    for ticker in result {
        let Some(contract) = ticker.get("contract").and_then(Value::as_str) else {
            error!("[GATE] ticker without contract: {ticker}");
            continue;
        };
        let Some(price) = parse_str_f64(ticker.get("last")) else {
            error!("[GATE] bad last for {contract}");
            continue;
        };
        events.push(TickerEvent {
            symbol: contract.to_string(),
            price,
            timestamp,
        });
    }
    events
}

/// One subscription frame carrying the full contract list.
pub fn build_subscribe(contracts: &[String], unix_time: u64) -> String {
    serde_json::json!({
        "time": unix_time,
        "channel": "futures.tickers",
        "event": "subscribe",
        "payload": contracts,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_update() {
        let json = r#"{
            "time_ms": 1672515782136,
            "channel": "futures.tickers",
            "event": "update",
            "result": [
                {"contract": "BTC_USDT", "last": "30000.5"},
                {"contract": "ETH_USDT", "last": "1800.25"}
            ]
        }"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].symbol, "BTC_USDT");
        assert_eq!(events[0].price, 30000.5);
        assert_eq!(events[0].timestamp, Some(1672515782.136));
        assert_eq!(events[1].symbol, "ETH_USDT");
    }

    #[test]
    fn acks_and_pongs_yield_nothing() {
        let ack = r#"{"time":1672515782,"channel":"futures.tickers","event":"subscribe","result":{"status":"success"}}"#;
        assert!(parse_message(ack).is_empty());
        let pong = r#"{"time_ms":1672515782136,"channel":"futures.pong","event":"","result":null}"#;
        assert!(parse_message(pong).is_empty());
    }

    #[test]
    fn subscribe_frame() {
        let frame: Value = serde_json::from_str(&build_subscribe(
            &["BTC_USDT".to_string(), "ETH_USDT".to_string()],
            1672515782,
        ))
        .unwrap();
        assert_eq!(
            frame,
            serde_json::json!({
                "time": 1672515782,
                "channel": "futures.tickers",
                "event": "subscribe",
                "payload": ["BTC_USDT", "ETH_USDT"],
            })
        );
    }
}
