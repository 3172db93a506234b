//! Adapter factory — venue tag → streaming adapter.

use std::sync::Arc;

use sf_core::config::AppConfig;
use sf_core::types::Venue;

use crate::VenueAdapter;
use crate::bingx::BingxCodec;
use crate::bitget::BitgetCodec;
use crate::bybit::BybitCodec;
use crate::gate::GateCodec;
use crate::lbank::LbankCodec;
use crate::mexc::MexcCodec;
use crate::okx::OkxCodec;
use crate::session::{SessionTiming, StreamingAdapter};
use crate::wallet::{MexcCredentials, WalletProbe};

/// Build the adapter for one venue.
///
/// Pairs each venue codec with its deposit/withdraw probe: MEXC and Gate
/// have real endpoints, Bitget/Bybit/OKX/BingX report open, LBank exposes
/// nothing and reports closed.
pub fn create_adapter(venue: Venue, config: &AppConfig) -> Arc<dyn VenueAdapter> {
    let timing = SessionTiming::from_config(config);
    match venue {
        Venue::Mexc => StreamingAdapter::new(
            Arc::new(MexcCodec),
            WalletProbe::Mexc(MexcCredentials::from_env()),
            timing,
        ),
        Venue::Bitget => StreamingAdapter::new(Arc::new(BitgetCodec), WalletProbe::AlwaysOpen, timing),
        Venue::Bybit => StreamingAdapter::new(Arc::new(BybitCodec), WalletProbe::AlwaysOpen, timing),
        Venue::Gate => StreamingAdapter::new(Arc::new(GateCodec), WalletProbe::Gate, timing),
        Venue::Okx => StreamingAdapter::new(Arc::new(OkxCodec), WalletProbe::AlwaysOpen, timing),
        Venue::Lbank => StreamingAdapter::new(Arc::new(LbankCodec), WalletProbe::Unsupported, timing),
        Venue::Bingx => StreamingAdapter::new(Arc::new(BingxCodec), WalletProbe::AlwaysOpen, timing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_venue_gets_an_adapter() {
        let config = AppConfig::default();
        for venue in Venue::ALL {
            let adapter = create_adapter(venue, &config);
            assert_eq!(adapter.venue(), venue);
        }
    }
}
