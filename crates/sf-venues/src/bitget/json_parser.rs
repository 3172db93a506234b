//! Bitget JSON message parser.
//!
//! Ticker snapshots carry an array of contracts, each with its own
//! millisecond timestamp:
//!
//! ```json
//! {"action":"snapshot","arg":{"instType":"USDT-FUTURES","channel":"ticker","instId":"BTCUSDT"},
//!  "data":[{"instId":"BTCUSDT","lastPr":"30000.5","ts":"1672515782136"}]}
//! ```

use serde_json::Value;
use tracing::error;

use crate::codec::TickerEvent;
use crate::json_util::{parse_str_f64, parse_ts_ms};

/// Parse one Bitget frame into ticker events.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    // Bitget answers our `ping` text frame with a bare `pong`.
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[BITGET] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Subscription acks ({"event":"subscribe",...}) carry no data array.
    let Some(data) = v.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut events = Vec::with_capacity(data.len());
    for ticker in data {
        let Some(symbol) = ticker.get("instId").and_then(Value::as_str) else {
            error!("[BITGET] ticker without instId: {ticker}");
            continue;
        };
        let Some(price) = parse_str_f64(ticker.get("lastPr")) else {
            error!("[BITGET] bad lastPr for {symbol}");
            continue;
        };
        events.push(TickerEvent {
            symbol: symbol.to_string(),
            price,
            timestamp: parse_ts_ms(ticker.get("ts")),
        });
    }
    events
}

/// Subscription frame for one USDT-futures contract.
pub fn build_subscribe(inst_id: &str) -> String {
    serde_json::json!({
        "op": "subscribe",
        "args": [{"instType": "USDT-FUTURES", "channel": "ticker", "instId": inst_id}]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_snapshot() {
        let json = r#"{
            "action": "snapshot",
            "arg": {"instType": "USDT-FUTURES", "channel": "ticker", "instId": "DYDXUSDT"},
            "data": [{"instId": "DYDXUSDT", "lastPr": "0.6138", "bidPr": "0.6136", "ts": "1745343298889"}]
        }"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "DYDXUSDT");
        assert_eq!(events[0].price, 0.6138);
        assert_eq!(events[0].timestamp, Some(1745343298.889));
    }

    #[test]
    fn pong_and_acks_yield_nothing() {
        assert!(parse_message("pong").is_empty());
        assert!(
            parse_message(r#"{"event":"subscribe","arg":{"channel":"ticker"}}"#).is_empty()
        );
    }

    #[test]
    fn subscribe_frame() {
        let frame: Value = serde_json::from_str(&build_subscribe("BTCUSDT")).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({
                "op": "subscribe",
                "args": [{"instType": "USDT-FUTURES", "channel": "ticker", "instId": "BTCUSDT"}]
            })
        );
    }
}
