//! Wall-clock helpers.
//!
//! Price records carry fractional seconds since the Unix epoch; venues that
//! omit a payload timestamp get the receipt time instead. These helpers
//! centralize the conversion.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as fractional **seconds** since the Unix epoch.
#[inline]
pub fn now_sec() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Current wall-clock time as whole **seconds** since the Unix epoch.
#[inline]
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Current wall-clock time as **milliseconds** since the Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clocks_agree() {
        let sec = now_sec();
        let unix = now_unix();
        assert!(sec > 1.6e9);
        assert!((sec - unix as f64).abs() < 2.0);
    }
}
