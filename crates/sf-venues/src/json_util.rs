//! Shared JSON parsing helpers used by all venue codecs.
//!
//! Exchanges encode numbers inconsistently — the same field may arrive as a
//! JSON string (`"30000.5"`) or a native number — so every codec funnels
//! numeric extraction through here.

/// Parse a JSON value (string or number) as `f64`.
#[inline]
pub fn parse_str_f64(v: Option<&serde_json::Value>) -> Option<f64> {
    let v = v?;
    if let Some(s) = v.as_str() {
        fast_float2::parse(s).ok()
    } else {
        v.as_f64()
    }
}

/// Parse a JSON value (string or number) as `u64`.
#[inline]
pub fn parse_str_u64(v: Option<&serde_json::Value>) -> Option<u64> {
    let v = v?;
    if let Some(s) = v.as_str() {
        s.parse().ok()
    } else {
        v.as_u64()
    }
}

/// Millisecond epoch field → fractional seconds.
#[inline]
pub fn parse_ts_ms(v: Option<&serde_json::Value>) -> Option<f64> {
    parse_str_u64(v).map(|ms| ms as f64 / 1000.0)
}
