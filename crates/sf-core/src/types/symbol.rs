//! Symbol normalization across venues.
//!
//! Every venue spells the same contract differently (`BTC_USDT`, `BTC-USDT`,
//! `btcusdt`); the canonical form — uppercase, separator-free — is the sole
//! key used to match prices across venues.

use crate::types::venue::Venue;

impl Venue {
    /// Canonicalize a venue-native symbol.
    ///
    /// All venues currently share the default transform; keeping the mapping
    /// keyed by venue leaves room for a venue that needs more than separator
    /// stripping without touching call sites.
    pub fn canonical_symbol(&self, raw: &str) -> String {
        canonicalize(raw)
    }
}

/// Uppercase and strip `_` / `-` separators.
pub fn canonicalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Strip a trailing `USDT` to obtain the base-only key used for wallet and
/// coin-metadata lookups (`BTCUSDT` → `BTC`).
///
/// Symbols without the suffix are returned uppercased but otherwise intact.
pub fn strip_usdt_suffix(symbol: &str) -> String {
    let upper = symbol.to_ascii_uppercase();
    if let Some(base) = upper.strip_suffix("USDT") {
        if !base.is_empty() {
            return base.to_string();
        }
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_uppercases() {
        assert_eq!(canonicalize("BTC_USDT"), "BTCUSDT");
        assert_eq!(canonicalize("BTC-USDT-SWAP"), "BTCUSDTSWAP");
        assert_eq!(canonicalize("btcusdt"), "BTCUSDT");
    }

    #[test]
    fn canonical_form_has_no_separators() {
        for venue in Venue::ALL {
            let canon = venue.canonical_symbol("eTh-Usd_t");
            assert!(!canon.contains('_'));
            assert!(!canon.contains('-'));
            assert_eq!(canon, canon.to_ascii_uppercase());
        }
    }

    #[test]
    fn venues_converge_on_one_key() {
        // The same contract as spelled by three different venues.
        let a = Venue::Mexc.canonical_symbol("BTC_USDT");
        let b = Venue::Bybit.canonical_symbol("BTCUSDT");
        let c = Venue::Okx.canonical_symbol("BTC-USDT");
        assert_eq!(a, "BTCUSDT");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn usdt_suffix_stripping() {
        assert_eq!(strip_usdt_suffix("BTCUSDT"), "BTC");
        assert_eq!(strip_usdt_suffix("ethusdt"), "ETH");
        assert_eq!(strip_usdt_suffix("BTCUSD"), "BTCUSD");
        // Degenerate input keeps its full form rather than going empty.
        assert_eq!(strip_usdt_suffix("USDT"), "USDT");
    }
}
