//! BingX JSON message parser.
//!
//! Last-price pushes:
//!
//! ```json
//! {"e":"lastPrice","s":"BTC-USDT","p":"30000.5","E":1672515782136}
//! ```

use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::codec::TickerEvent;
use crate::json_util::{parse_str_f64, parse_ts_ms};

/// Parse one BingX frame into ticker events.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[BINGX] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Subscription acks and pings carry no event type.
    if v.get("e").and_then(Value::as_str) != Some("lastPrice") {
        return Vec::new();
    }

    let Some(symbol) = v.get("s").and_then(Value::as_str) else {
        error!("[BINGX] lastPrice without symbol: {v}");
        return Vec::new();
    };
    let Some(price) = parse_str_f64(v.get("p")) else {
        error!("[BINGX] bad price for {symbol}");
        return Vec::new();
    };

    vec![TickerEvent {
        symbol: symbol.to_string(),
        price,
        timestamp: parse_ts_ms(v.get("E")),
    }]
}

/// Subscription frame for one symbol's last-price channel.
///
/// BingX wants a unique request id per subscription; a fresh UUID v4 fits.
pub fn build_subscribe(symbol: &str) -> String {
    serde_json::json!({
        "id": Uuid::new_v4().to_string(),
        "reqType": "sub",
        "dataType": format!("{symbol}@lastPrice"),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_last_price() {
        let json = r#"{"e":"lastPrice","s":"BTC-USDT","p":"30000.5","E":1672515782136}"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "BTC-USDT");
        assert_eq!(events[0].price, 30000.5);
        assert_eq!(events[0].timestamp, Some(1672515782.136));
    }

    #[test]
    fn other_frames_yield_nothing() {
        assert!(parse_message(r#"{"id":"abc","code":0,"msg":""}"#).is_empty());
        assert!(parse_message("pong").is_empty());
    }

    #[test]
    fn subscribe_frame_shape() {
        let frame: Value = serde_json::from_str(&build_subscribe("BTC-USDT")).unwrap();
        assert_eq!(frame["reqType"], "sub");
        assert_eq!(frame["dataType"], "BTC-USDT@lastPrice");
        // Each frame carries a fresh, well-formed request id.
        let id = frame["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        let again: Value = serde_json::from_str(&build_subscribe("BTC-USDT")).unwrap();
        assert_ne!(frame["id"], again["id"]);
    }
}
