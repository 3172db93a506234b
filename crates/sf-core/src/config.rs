//! Application configuration.
//!
//! One JSON file configures the whole process. Every field is optional; the
//! defaults run all supported venues with the stock thresholds.
//!
//! # Example config
//!
//! ```json
//! {
//!   "venues": ["MEXC", "BITGET", "GATE"],
//!   "min_spread_percent": 1.0,
//!   "min_spread_change_percent": 2.0,
//!   "ignore_tokens_path": "ignore_tokens.json"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::venue::Venue;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Venues to run, by tag (default: all supported).
    pub venues: Vec<String>,

    /// Minimum spread percent for an opportunity to qualify.
    pub min_spread_percent: f64,

    /// Minimum absolute change (percentage points) against the last reported
    /// spread before a symbol is alerted again.
    pub min_spread_change_percent: f64,

    /// Path of the ignore-list JSON file (`{"ignoring_tokens": [..]}`).
    pub ignore_tokens_path: PathBuf,

    /// Keep-alive ping interval, seconds.
    pub ping_interval_sec: u64,

    /// Fixed delay before each reconnect attempt, seconds.
    pub reconnect_delay_sec: u64,

    /// Settle time between a reconnect and re-subscription, seconds.
    pub resubscribe_settle_sec: u64,

    /// Drop alerts for symbols that are not tradable on MEXC.
    pub require_mexc_listing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            venues: Venue::ALL.iter().map(|v| v.as_str().to_string()).collect(),
            min_spread_percent: 1.0,
            min_spread_change_percent: 2.0,
            ignore_tokens_path: PathBuf::from("ignore_tokens.json"),
            ping_interval_sec: 10,
            reconnect_delay_sec: 5,
            resubscribe_settle_sec: 4,
            require_mexc_listing: true,
        }
    }
}

impl AppConfig {
    /// Parse the configured venue tags.
    ///
    /// An unrecognized tag is a config error — failing at startup beats
    /// silently running with fewer venues than asked for.
    pub fn enabled_venues(&self) -> Result<Vec<Venue>> {
        self.venues
            .iter()
            .map(|tag| Venue::from_str(tag).with_context(|| format!("in `venues`: {tag:?}")))
            .collect()
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: AppConfig =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_venues() {
        let config = AppConfig::default();
        assert_eq!(config.enabled_venues().unwrap(), Venue::ALL.to_vec());
        assert_eq!(config.min_spread_change_percent, 2.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"venues": ["gate", "OKX"], "min_spread_percent": 3.5}"#)
                .unwrap();
        assert_eq!(
            config.enabled_venues().unwrap(),
            vec![Venue::Gate, Venue::Okx]
        );
        assert_eq!(config.min_spread_percent, 3.5);
        assert_eq!(config.reconnect_delay_sec, 5);
    }

    #[test]
    fn unknown_venue_is_an_error() {
        let config: AppConfig = serde_json::from_str(r#"{"venues": ["NASDAQ"]}"#).unwrap();
        assert!(config.enabled_venues().is_err());
    }
}
