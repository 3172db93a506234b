//! Generic streaming adapter engine.
//!
//! [`StreamingAdapter`] is the one concrete [`VenueAdapter`]: it owns the
//! WebSocket session, the cached symbol list, the per-adapter price map, and
//! the callback registry. Everything venue-specific is delegated to the
//! [`VenueCodec`] it is constructed with, so adding a venue means writing a
//! codec, not another engine.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use ahash::AHashMap;
use anyhow::Result;
use async_trait::async_trait;
use sf_core::config::AppConfig;
use sf_core::time_util;
use sf_core::types::Venue;
use sf_core::types::market::PriceUpdate;
use sf_core::ws::{OnTextCallback, SessionState, SubscribeProvider, WsSession, WsSessionConfig};
use tracing::{info, warn};

use crate::codec::VenueCodec;
use crate::wallet::WalletProbe;
use crate::{PriceCallback, VenueAdapter};

/// Keep-alive and reconnect timing, shared by every adapter in a process.
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    pub ping_interval: Duration,
    pub reconnect_delay: Duration,
    pub resubscribe_settle: Duration,
}

impl SessionTiming {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_sec),
            reconnect_delay: Duration::from_secs(config.reconnect_delay_sec),
            resubscribe_settle: Duration::from_secs(config.resubscribe_settle_sec),
        }
    }
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(5),
            resubscribe_settle: Duration::from_secs(4),
        }
    }
}

/// What the adapter was asked to subscribe to.
#[derive(Debug, Clone, PartialEq)]
enum SymbolSelection {
    /// `subscribe`/`set_symbols` not called yet — a reconnect replays nothing.
    Unset,
    /// The venue's all-tickers channel.
    All,
    /// An explicit venue-native symbol list.
    Listed(Vec<String>),
}

/// State shared between the adapter surface and the session callbacks.
struct Shared {
    codec: Arc<dyn VenueCodec>,
    /// Last requested selection. Written by `set_symbols`/`subscribe`, read
    /// by the reconnect replay — hence the lock.
    symbols: Mutex<SymbolSelection>,
    /// Canonical symbols currently subscribed.
    available_pairs: Mutex<HashSet<String>>,
    /// Latest price per canonical symbol.
    prices: Mutex<AHashMap<String, f64>>,
    callbacks: RwLock<Vec<PriceCallback>>,
}

impl Shared {
    /// Subscription frames to replay after a reconnect.
    fn replay_frames(&self) -> Vec<String> {
        let selection = self.symbols.lock().unwrap();
        match &*selection {
            SymbolSelection::Unset => Vec::new(),
            SymbolSelection::All => self.codec.subscribe_all().into_iter().collect(),
            SymbolSelection::Listed(list) => self.codec.subscribe_frames(list),
        }
    }

    /// Decode one frame and fan the resulting updates out.
    fn handle_frame(&self, text: &str) {
        let venue = self.codec.venue();
        for event in self.codec.parse(text) {
            // Also drops NaN.
            if !(event.price > 0.0) {
                continue;
            }
            let canonical = venue.canonical_symbol(&event.symbol);
            if canonical.is_empty() {
                continue;
            }
            let timestamp = event.timestamp.unwrap_or_else(time_util::now_sec);

            self.prices
                .lock()
                .unwrap()
                .insert(canonical.clone(), event.price);

            let update = PriceUpdate {
                venue,
                symbol: canonical,
                price: event.price,
                timestamp,
            };
            let callbacks = self.callbacks.read().unwrap();
            for callback in callbacks.iter() {
                callback(update.clone());
            }
        }
    }
}

/// A venue adapter: one WebSocket session driven by a venue codec.
pub struct StreamingAdapter {
    shared: Arc<Shared>,
    wallet: WalletProbe,
    http: reqwest::Client,
    session: tokio::sync::Mutex<WsSession>,
}

impl StreamingAdapter {
    pub fn new(
        codec: Arc<dyn VenueCodec>,
        wallet: WalletProbe,
        timing: SessionTiming,
    ) -> Arc<Self> {
        let config = WsSessionConfig {
            url: codec.ws_url().to_string(),
            ping_interval: codec.ping_payload().is_some().then_some(timing.ping_interval),
            ping_payload: codec.ping_payload(),
            reconnect_delay: timing.reconnect_delay,
            resubscribe_settle: timing.resubscribe_settle,
            label: codec.venue().as_str().to_string(),
        };

        let shared = Arc::new(Shared {
            codec,
            symbols: Mutex::new(SymbolSelection::Unset),
            available_pairs: Mutex::new(HashSet::new()),
            prices: Mutex::new(AHashMap::new()),
            callbacks: RwLock::new(Vec::new()),
        });

        Arc::new(Self {
            shared,
            wallet,
            http: reqwest::Client::new(),
            session: tokio::sync::Mutex::new(WsSession::new(config)),
        })
    }
}

#[async_trait]
impl VenueAdapter for StreamingAdapter {
    fn venue(&self) -> Venue {
        self.shared.codec.venue()
    }

    fn register_price_callback(&self, callback: PriceCallback) {
        self.shared.callbacks.write().unwrap().push(callback);
    }

    async fn set_symbols(&self, symbols: Option<Vec<String>>) {
        let selection = match symbols {
            Some(list) => SymbolSelection::Listed(list),
            None => SymbolSelection::All,
        };
        *self.shared.symbols.lock().unwrap() = selection;
    }

    async fn connect(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if session.is_started() {
            warn!("[{}] already connected", self.venue());
            return Ok(());
        }

        let shared = self.shared.clone();
        let on_text: OnTextCallback = Arc::new(move |text| shared.handle_frame(text));
        let shared = self.shared.clone();
        let resubscribe: SubscribeProvider = Arc::new(move || shared.replay_frames());

        session.start(on_text, resubscribe);
        Ok(())
    }

    async fn subscribe(&self, symbols: Option<Vec<String>>) -> Result<()> {
        let venue = self.venue();
        self.set_symbols(symbols.clone()).await;

        match symbols {
            None => match self.shared.codec.subscribe_all() {
                Some(frame) => {
                    let session = self.session.lock().await;
                    if let Err(e) = session.send(frame).await {
                        warn!("[{venue}] subscribe send failed: {e}");
                    }
                    info!("[{venue}] subscribed to all tickers");
                }
                None => {
                    warn!("[{venue}] has no all-tickers channel; nothing subscribed");
                }
            },
            Some(list) => {
                let frames = self.shared.codec.subscribe_frames(&list);
                {
                    let session = self.session.lock().await;
                    for frame in frames {
                        // One bad frame must not take the others down.
                        if let Err(e) = session.send(frame).await {
                            warn!("[{venue}] subscribe send failed: {e}");
                        }
                    }
                }

                let mut pairs = self.shared.available_pairs.lock().unwrap();
                for symbol in &list {
                    let native = self.shared.codec.native_symbol(symbol);
                    pairs.insert(venue.canonical_symbol(&native));
                }
                info!("[{venue}] subscribed to {} symbol(s)", list.len());
            }
        }
        Ok(())
    }

    async fn close(&self) {
        self.session.lock().await.stop().await;
    }

    async fn deposit_withdraw_status(&self, symbol: &str) -> (bool, bool) {
        self.wallet.status(&self.http, symbol).await
    }

    async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    fn available_pairs(&self) -> HashSet<String> {
        self.shared.available_pairs.lock().unwrap().clone()
    }

    fn last_price(&self, symbol: &str) -> Option<f64> {
        self.shared.prices.lock().unwrap().get(symbol).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TickerEvent;

    /// Minimal codec: every frame decodes to one fixed ticker.
    struct TestCodec;

    impl VenueCodec for TestCodec {
        fn venue(&self) -> Venue {
            Venue::Bitget
        }
        fn ws_url(&self) -> &'static str {
            "wss://example.invalid/ws"
        }
        fn ping_payload(&self) -> Option<sf_core::ws::PingPayload> {
            None
        }
        fn native_symbol(&self, raw: &str) -> String {
            raw.to_ascii_uppercase()
        }
        fn subscribe_frames(&self, symbols: &[String]) -> Vec<String> {
            symbols.iter().map(|s| format!("sub:{s}")).collect()
        }
        fn parse(&self, text: &str) -> Vec<TickerEvent> {
            if text == "pong" {
                return Vec::new();
            }
            vec![TickerEvent {
                symbol: "btc_usdt".into(),
                price: 100.0,
                timestamp: None,
            }]
        }
    }

    fn test_adapter() -> Arc<StreamingAdapter> {
        StreamingAdapter::new(
            Arc::new(TestCodec),
            WalletProbe::AlwaysOpen,
            SessionTiming::default(),
        )
    }

    #[tokio::test]
    async fn frames_become_canonical_updates() {
        let adapter = test_adapter();
        let seen: Arc<Mutex<Vec<PriceUpdate>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        adapter.register_price_callback(Arc::new(move |update| {
            sink.lock().unwrap().push(update);
        }));

        adapter.shared.handle_frame("anything");
        adapter.shared.handle_frame("pong");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].venue, Venue::Bitget);
        assert_eq!(seen[0].symbol, "BTCUSDT");
        assert_eq!(seen[0].price, 100.0);
        // No payload timestamp — receipt time is stamped in.
        assert!(seen[0].timestamp > 1.6e9);
        assert_eq!(adapter.last_price("BTCUSDT"), Some(100.0));
    }

    #[tokio::test]
    async fn subscribe_records_canonical_pairs_and_caches_symbols() {
        let adapter = test_adapter();
        adapter
            .subscribe(Some(vec!["btc_usdt".into(), "eth_usdt".into()]))
            .await
            .unwrap();

        let pairs = adapter.available_pairs();
        assert!(pairs.contains("BTCUSDT"));
        assert!(pairs.contains("ETHUSDT"));

        // The reconnect replay regenerates frames from the cached list.
        assert_eq!(
            adapter.shared.replay_frames(),
            vec!["sub:btc_usdt".to_string(), "sub:eth_usdt".to_string()]
        );
    }

    #[tokio::test]
    async fn replay_is_empty_until_asked_and_for_unsupported_all() {
        let adapter = test_adapter();
        assert!(adapter.shared.replay_frames().is_empty());

        // TestCodec has no all-tickers channel: selection is stored but the
        // replay stays empty.
        adapter.subscribe(None).await.unwrap();
        assert!(adapter.shared.replay_frames().is_empty());
    }
}
