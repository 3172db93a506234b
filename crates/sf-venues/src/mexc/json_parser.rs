//! MEXC JSON message parser.
//!
//! Ticker pushes carry an array of contracts and one shared millisecond
//! timestamp:
//!
//! ```json
//! {"channel":"push.tickers","data":[{"symbol":"BTC_USDT","lastPrice":30000.5}],"ts":1672515782136}
//! ```

use serde_json::Value;
use tracing::error;

use crate::codec::TickerEvent;
use crate::json_util::{parse_str_f64, parse_ts_ms};

/// Parse one MEXC frame into ticker events.
///
/// Pongs and subscription acks yield nothing; malformed frames are logged
/// and likewise yield nothing.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[MEXC] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Acks and pong objects carry no ticker array.
    let Some(data) = v.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };
    let timestamp = parse_ts_ms(v.get("ts"));

    let mut events = Vec::with_capacity(data.len());
    for ticker in data {
        let Some(symbol) = ticker.get("symbol").and_then(Value::as_str) else {
            error!("[MEXC] ticker without symbol: {ticker}");
            continue;
        };
        let Some(price) = parse_str_f64(ticker.get("lastPrice")) else {
            error!("[MEXC] bad lastPrice for {symbol}");
            continue;
        };
        events.push(TickerEvent {
            symbol: symbol.to_string(),
            price,
            timestamp,
        });
    }
    events
}

/// Subscription frame for one contract.
pub fn build_subscribe(contract: &str) -> String {
    serde_json::json!({"method": "sub.tickers", "param": {"symbol": contract}}).to_string()
}

/// The all-tickers subscription.
pub fn build_subscribe_all() -> String {
    serde_json::json!({"method": "sub.tickers", "param": {}}).to_string()
}
