//! Alert deduplication and the ignore-list.
//!
//! A spread that barely moves would otherwise re-alert on every tick; the
//! deduper only lets a symbol through again once its spread has drifted a
//! configured number of percentage points from the last alert that was
//! actually emitted.

use std::collections::HashSet;
use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;
use tracing::warn;

/// Per-symbol dedup state, created lazily on first observation.
#[derive(Debug, Clone, Default)]
pub struct SpreadState {
    /// Spread percent of the last alert actually emitted.
    pub last_reported_spread: f64,
    /// Most recent spread percent seen, emitted or not.
    pub last_observed_spread: f64,
}

/// On-disk shape of the ignore file.
#[derive(Debug, Deserialize)]
struct IgnoreFile {
    #[serde(default)]
    ignoring_tokens: Vec<String>,
}

/// Prefix set of symbols that never alert.
#[derive(Debug, Default)]
pub struct IgnoreList {
    prefixes: HashSet<String>,
}

impl IgnoreList {
    pub fn new(prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Load `{"ignoring_tokens": [..]}` from disk.
    ///
    /// A missing or corrupt file degrades to an empty set — the process
    /// alerts on everything rather than refusing to start.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "ignore list {} not readable ({e}); alerting on all symbols",
                    path.display()
                );
                return Self::default();
            }
        };
        match serde_json::from_str::<IgnoreFile>(&content) {
            Ok(file) => Self::new(file.ignoring_tokens),
            Err(e) => {
                warn!("ignore list {} is not valid JSON ({e}); alerting on all symbols", path.display());
                Self::default()
            }
        }
    }

    /// A symbol is ignored when any configured prefix is a prefix of it.
    pub fn is_ignored(&self, symbol: &str) -> bool {
        self.prefixes.iter().any(|p| symbol.starts_with(p.as_str()))
    }
}

/// Suppresses alerts whose spread has not moved enough since the last one.
pub struct AlertDeduper {
    min_spread_change_percent: f64,
    states: AHashMap<String, SpreadState>,
    ignore: IgnoreList,
}

impl AlertDeduper {
    pub fn new(min_spread_change_percent: f64, ignore: IgnoreList) -> Self {
        Self {
            min_spread_change_percent,
            states: AHashMap::new(),
            ignore,
        }
    }

    /// Decide whether `current_spread` on `symbol` warrants a fresh alert.
    ///
    /// The observed spread is recorded either way; the reported spread only
    /// advances when this returns `true`.
    pub fn should_notify(&mut self, symbol: &str, current_spread: f64) -> bool {
        if self.ignore.is_ignored(symbol) {
            return false;
        }

        let state = self.states.entry(symbol.to_string()).or_default();
        state.last_observed_spread = current_spread;

        if (current_spread - state.last_reported_spread).abs() >= self.min_spread_change_percent {
            state.last_reported_spread = current_spread;
            true
        } else {
            false
        }
    }

    /// Dedup state for a symbol, if it has been observed.
    pub fn state(&self, symbol: &str) -> Option<&SpreadState> {
        self.states.get(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deduper(min_change: f64) -> AlertDeduper {
        AlertDeduper::new(min_change, IgnoreList::default())
    }

    #[test]
    fn small_steps_alert_exactly_once() {
        // Monotone series staying within the 2.0 band of the first report:
        // only the first emits, but every observation is recorded.
        let mut deduper = deduper(2.0);
        let mut emitted = 0;
        for spread in [5.0, 5.5, 6.0, 6.5] {
            if deduper.should_notify("BTCUSDT", spread) {
                emitted += 1;
            }
        }
        assert_eq!(emitted, 1);
        let state = deduper.state("BTCUSDT").unwrap();
        assert_eq!(state.last_reported_spread, 5.0);
        assert_eq!(state.last_observed_spread, 6.5);

        // Cumulative drift against the *reported* spread re-arms the alert.
        assert!(deduper.should_notify("BTCUSDT", 7.0));
        assert_eq!(deduper.state("BTCUSDT").unwrap().last_reported_spread, 7.0);
    }

    #[test]
    fn large_steps_alert_every_time() {
        let mut deduper = deduper(2.0);
        for i in 0..5 {
            assert!(deduper.should_notify("BTCUSDT", 3.0 + 2.0 * i as f64));
        }
    }

    #[test]
    fn shrinking_spread_also_realerts() {
        let mut deduper = deduper(2.0);
        assert!(deduper.should_notify("BTCUSDT", 8.0));
        assert!(!deduper.should_notify("BTCUSDT", 7.0));
        assert!(deduper.should_notify("BTCUSDT", 5.5));
    }

    #[test]
    fn ignored_prefixes_never_notify() {
        let ignore = IgnoreList::new(["LUNA".to_string(), "TEST".to_string()]);
        let mut deduper = AlertDeduper::new(2.0, ignore);
        assert!(!deduper.should_notify("LUNAUSDT", 100.0));
        assert!(!deduper.should_notify("TESTCOINUSDT", 50.0));
        assert!(deduper.should_notify("BTCUSDT", 5.0));
    }

    #[test]
    fn missing_ignore_file_degrades_to_empty() {
        let list = IgnoreList::load(Path::new("/nonexistent/ignore_tokens.json"));
        assert!(!list.is_ignored("BTCUSDT"));
    }
}
