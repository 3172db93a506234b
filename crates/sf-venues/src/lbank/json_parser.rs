//! LBank JSON message parser.
//!
//! Tick pushes:
//!
//! ```json
//! {"type":"tick","pair":"BTC_USDT","tick":{"latest":30000.5},"TS":"2023-01-01T12:03:02.136"}
//! ```
//!
//! `TS` is an ISO-8601 string; a failed parse falls back to receipt time
//! (the event's `timestamp` stays `None`).

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::error;

use crate::codec::TickerEvent;
use crate::json_util::parse_str_f64;

/// Parse one LBank frame into ticker events.
pub fn parse_message(text: &str) -> Vec<TickerEvent> {
    if text == "pong" {
        return Vec::new();
    }
    let v: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            error!("[LBANK] non-JSON frame ({e}): {text}");
            return Vec::new();
        }
    };

    // Keep-alive answers arrive as {"action":"pong",...}.
    if v.get("action").and_then(Value::as_str) == Some("pong") {
        return Vec::new();
    }
    if v.get("type").and_then(Value::as_str) != Some("tick") {
        return Vec::new();
    }

    let Some(pair) = v.get("pair").and_then(Value::as_str) else {
        error!("[LBANK] tick without pair: {v}");
        return Vec::new();
    };
    let Some(price) = parse_str_f64(v.get("tick").and_then(|t| t.get("latest"))) else {
        error!("[LBANK] bad tick.latest for {pair}");
        return Vec::new();
    };

    let timestamp = v
        .get("TS")
        .and_then(Value::as_str)
        .and_then(parse_lbank_time);

    vec![TickerEvent {
        symbol: pair.to_string(),
        price,
        timestamp,
    }]
}

/// Parse LBank's `%Y-%m-%dT%H:%M:%S.%f` timestamp into epoch seconds.
///
/// The string carries no zone; it is read as UTC.
pub fn parse_lbank_time(raw: &str) -> Option<f64> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_micros() as f64 / 1_000_000.0)
}

/// Subscription frame for one pair.
pub fn build_subscribe(pair: &str) -> String {
    serde_json::json!({"action": "subscribe", "subscribe": "tick", "pair": pair}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tick() {
        let json = r#"{
            "type": "tick",
            "pair": "BTC_USDT",
            "tick": {"latest": 30000.5, "high": 31000.0},
            "TS": "2023-01-01T12:03:02.136"
        }"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].symbol, "BTC_USDT");
        assert_eq!(events[0].price, 30000.5);
        let ts = events[0].timestamp.unwrap();
        assert!((ts - 1672574582.136).abs() < 1e-6);
    }

    #[test]
    fn bad_timestamp_falls_back_to_receipt_time() {
        let json = r#"{"type":"tick","pair":"BTC_USDT","tick":{"latest":1.0},"TS":"not-a-time"}"#;
        let events = parse_message(json);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, None);
    }

    #[test]
    fn pong_yields_nothing() {
        assert!(parse_message(r#"{"action":"pong","pong":"0.9"}"#).is_empty());
    }

    #[test]
    fn time_format() {
        assert_eq!(
            parse_lbank_time("2023-01-01T00:00:00.000"),
            Some(1672531200.0)
        );
        assert_eq!(parse_lbank_time("garbage"), None);
    }

    #[test]
    fn subscribe_frame() {
        let frame: Value = serde_json::from_str(&build_subscribe("BTC_USDT")).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({"action": "subscribe", "subscribe": "tick", "pair": "BTC_USDT"})
        );
    }
}
