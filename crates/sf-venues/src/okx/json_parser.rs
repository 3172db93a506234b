//! OKX JSON message parser.
//!
//! Ticker pushes route by `arg.channel`:
//!
//! ```json
//! {"arg":{"channel":"tickers","instId":"BTC-USDT-SWAP"},
//!  "data":[{"instId":"BTC-USDT-SWAP","last":"30000.5","ts":"1672515782136"}]}
//! ```

use serde_json::Value;
use tracing::error;

use crate::codec::TickerEvent;
use crate::json_util::{parse_str_f64, parse_ts_ms};

/// Parse one OKX frame into ticker events.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    // OKX echoes "pong" in response to keep-alive.
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[OKX] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Event frames (subscribe acks, errors) have no matching arg.channel.
    if v.get("arg").and_then(|a| a.get("channel")).and_then(Value::as_str) != Some("tickers") {
        return Vec::new();
    }
    let Some(data) = v.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut events = Vec::with_capacity(data.len());
    for ticker in data {
        let Some(inst_id) = ticker.get("instId").and_then(Value::as_str) else {
            error!("[OKX] ticker without instId: {ticker}");
            continue;
        };
        let Some(price) = parse_str_f64(ticker.get("last")) else {
            error!("[OKX] bad last for {inst_id}");
            continue;
        };
        events.push(TickerEvent {
            symbol: inst_id.to_string(),
            price,
            timestamp: parse_ts_ms(ticker.get("ts")),
        });
    }
    events
}

/// Subscription frame for one instId.
pub fn build_subscribe(inst_id: &str) -> String {
    serde_json::json!({
        "op": "subscribe",
        "args": [{"channel": "tickers", "instId": inst_id}]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ticker_push() {
        let json = r#"{
            "arg": {"channel": "tickers", "instId": "BTC-USDT-SWAP"},
            "data": [{"instId": "BTC-USDT-SWAP", "last": "30000.5", "ts": "1672515782136"}]
        }"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "BTC-USDT-SWAP");
        assert_eq!(events[0].price, 30000.5);
        assert_eq!(events[0].timestamp, Some(1672515782.136));
    }

    #[test]
    fn non_ticker_frames_yield_nothing() {
        assert!(parse_message("pong").is_empty());
        assert!(
            parse_message(r#"{"event":"subscribe","arg":{"channel":"tickers","instId":"BTC-USDT-SWAP"}}"#)
                .is_empty()
        );
        assert!(parse_message(r#"{"event":"error","code":"60012","msg":"Invalid request"}"#).is_empty());
    }

    #[test]
    fn subscribe_frame() {
        let frame: Value = serde_json::from_str(&build_subscribe("BTC-USDT-SWAP")).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({
                "op": "subscribe",
                "args": [{"channel": "tickers", "instId": "BTC-USDT-SWAP"}]
            })
        );
    }
}
