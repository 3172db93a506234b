//! Single WebSocket session with keep-alive and fixed-backoff reconnect.
//!
//! Each `WsSession` runs as a tokio task that:
//! 1. Connects to the venue WebSocket endpoint (TLS).
//! 2. Reads frames and forwards text to a callback.
//! 3. Sends periodic application-level ping frames (venue-specific format).
//! 4. On disconnect, read error, or ping failure: waits a fixed back-off,
//!    reconnects, settles, and replays the subscription frames produced by
//!    the configured provider.
//!
//! The session walks `Idle → Connecting → Connected → Subscribing →
//! Streaming`, falling back to `Reconnecting` on any transport failure and
//! ending in `Closed` once [`WsSession::stop`] is called. The current state
//! is observable through [`WsSession::state`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Callback invoked for each received text frame.
pub type OnTextCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Produces the subscription frames to replay after a reconnect.
///
/// Evaluated lazily on every reconnect so the replay always reflects the most
/// recent symbol list handed to the adapter, however often it changed while
/// the socket was down.
pub type SubscribeProvider = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// Ping payload format — varies by venue.
#[derive(Debug, Clone)]
pub enum PingPayload {
    /// A bare text frame (Bitget expects the literal `ping`).
    Text(String),
    /// A JSON object sent as text (e.g. `{"op":"ping"}`).
    Json(serde_json::Value),
}

impl PingPayload {
    fn to_message(&self) -> Message {
        match self {
            PingPayload::Text(t) => Message::Text(t.clone().into()),
            PingPayload::Json(j) => Message::Text(j.to_string().into()),
        }
    }
}

/// Where the session currently is in its connect/stream/reconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Connected,
    Subscribing,
    Streaming,
    Reconnecting,
    Closing,
    Closed,
}

/// Configuration for one venue session.
#[derive(Debug, Clone)]
pub struct WsSessionConfig {
    /// Full WebSocket URL (e.g. `wss://ws.bitget.com/v2/ws/public`).
    pub url: String,
    /// Interval between keep-alive pings. `None` disables application pings.
    pub ping_interval: Option<Duration>,
    /// Ping frame format. Ignored when `ping_interval` is `None`.
    pub ping_payload: Option<PingPayload>,
    /// Fixed delay before each reconnect attempt.
    pub reconnect_delay: Duration,
    /// Settle time between a reconnect and the subscription replay.
    pub resubscribe_settle: Duration,
    /// Label used in log lines (the venue tag).
    pub label: String,
}

/// A WebSocket session managed by a background tokio task.
pub struct WsSession {
    config: WsSessionConfig,
    outbound_tx: Option<mpsc::Sender<String>>,
    shutdown_tx: Option<watch::Sender<bool>>,
    state_rx: watch::Receiver<SessionState>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl WsSession {
    /// Create a new (not yet started) session.
    pub fn new(config: WsSessionConfig) -> Self {
        let (_, state_rx) = watch::channel(SessionState::Idle);
        Self {
            config,
            outbound_tx: None,
            shutdown_tx: None,
            state_rx,
            task: None,
        }
    }

    /// Start the session task.
    ///
    /// `on_text` receives every text frame; `resubscribe` is called after each
    /// reconnect to regenerate the subscription frames.
    pub fn start(&mut self, on_text: OnTextCallback, resubscribe: SubscribeProvider) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        // Sized to absorb a full catalog's one-frame-per-symbol subscribe
        // burst while the socket is still connecting.
        let (outbound_tx, outbound_rx) = mpsc::channel::<String>(4096);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let config = self.config.clone();

        let task = tokio::spawn(async move {
            session_loop(config, on_text, resubscribe, outbound_rx, shutdown_rx, state_tx).await;
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.outbound_tx = Some(outbound_tx);
        self.state_rx = state_rx;
        self.task = Some(task);
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    /// Whether [`WsSession::start`] has been called (and not yet stopped).
    pub fn is_started(&self) -> bool {
        self.task.is_some()
    }

    /// Send a text frame on this session.
    ///
    /// Frames queued while the socket is down are flushed once it is up.
    pub async fn send(&self, msg: String) -> anyhow::Result<()> {
        if let Some(tx) = &self.outbound_tx {
            tx.send(msg).await?;
        }
        Ok(())
    }

    /// Stop the session and wait for the task to finish. Idempotent.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.outbound_tx = None;
    }
}

/// Main session loop — connects, subscribes, reads, pings, reconnects.
async fn session_loop(
    config: WsSessionConfig,
    on_text: OnTextCallback,
    resubscribe: SubscribeProvider,
    mut outbound_rx: mpsc::Receiver<String>,
    mut shutdown_rx: watch::Receiver<bool>,
    state_tx: watch::Sender<SessionState>,
) {
    let label = config.label.clone();
    // Frames for the very first connection come from the adapter's explicit
    // `subscribe()`; the provider only replays them on reconnects.
    let mut reconnecting = false;

    loop {
        if *shutdown_rx.borrow() {
            let _ = state_tx.send(SessionState::Closed);
            info!("[{label}] shutdown requested");
            return;
        }

        let _ = state_tx.send(SessionState::Connecting);
        info!("[{label}] connecting to {}", config.url);

        let ws_stream = match tokio_tungstenite::connect_async(config.url.as_str()).await {
            Ok((stream, _response)) => {
                info!("[{label}] connected");
                stream
            }
            Err(e) => {
                warn!(
                    "[{label}] connection failed: {e}, retrying in {:?}",
                    config.reconnect_delay
                );
                let _ = state_tx.send(SessionState::Reconnecting);
                tokio::select! {
                    _ = tokio::time::sleep(config.reconnect_delay) => {}
                    _ = shutdown_rx.changed() => {
                        let _ = state_tx.send(SessionState::Closed);
                        return;
                    }
                }
                continue;
            }
        };

        let _ = state_tx.send(SessionState::Connected);
        let (mut ws_write, mut ws_read) = ws_stream.split();

        if reconnecting {
            // Let the venue finish its handshake housekeeping before the
            // subscription replay.
            tokio::select! {
                _ = tokio::time::sleep(config.resubscribe_settle) => {}
                _ = shutdown_rx.changed() => {
                    let _ = ws_write.close().await;
                    let _ = state_tx.send(SessionState::Closed);
                    return;
                }
            }

            let frames = resubscribe();
            if !frames.is_empty() {
                let _ = state_tx.send(SessionState::Subscribing);
                debug!("[{label}] replaying {} subscription frame(s)", frames.len());
                let mut failed = false;
                for frame in frames {
                    if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                        warn!("[{label}] re-subscribe send failed: {e}");
                        failed = true;
                        break;
                    }
                }
                if failed {
                    let _ = state_tx.send(SessionState::Reconnecting);
                    tokio::select! {
                        _ = tokio::time::sleep(config.reconnect_delay) => {}
                        _ = shutdown_rx.changed() => {
                            let _ = state_tx.send(SessionState::Closed);
                            return;
                        }
                    }
                    continue;
                }
            }
        }

        let _ = state_tx.send(SessionState::Streaming);

        // Set up the keep-alive timer.
        let ping_interval = config.ping_interval.map(tokio::time::interval);

        // Pin the interval for use in select!
        tokio::pin! {
            let ping_tick = async {
                if let Some(mut interval) = ping_interval {
                    // The first tick fires immediately; skip it so the venue
                    // is not pinged right after the handshake.
                    interval.tick().await;
                    loop {
                        interval.tick().await;
                    }
                } else {
                    // No pinging — wait forever.
                    std::future::pending::<()>().await
                }
            };
        }

        // Main read/write loop.
        loop {
            tokio::select! {
                // Shutdown signal
                _ = shutdown_rx.changed() => {
                    let _ = state_tx.send(SessionState::Closing);
                    info!("[{label}] shutdown signal received");
                    let _ = ws_write.close().await;
                    let _ = state_tx.send(SessionState::Closed);
                    return;
                }

                // Incoming frame
                msg = ws_read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            on_text(&text);
                        }
                        Some(Ok(Message::Ping(data))) => {
                            let _ = ws_write.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            warn!("[{label}] received close frame");
                            break;
                        }
                        Some(Err(e)) => {
                            warn!("[{label}] read error: {e}");
                            break;
                        }
                        None => {
                            warn!("[{label}] stream ended");
                            break;
                        }
                        _ => {} // Pong, Binary, Frame — ignore
                    }
                }

                // Outbound frame from the adapter (subscriptions)
                Some(msg) = outbound_rx.recv() => {
                    if let Err(e) = ws_write.send(Message::Text(msg.into())).await {
                        warn!("[{label}] send error: {e}");
                        break;
                    }
                }

                // Keep-alive timer
                _ = &mut ping_tick => {
                    let ping_msg = match &config.ping_payload {
                        Some(payload) => payload.to_message(),
                        None => Message::Ping(vec![].into()),
                    };
                    if let Err(e) = ws_write.send(ping_msg).await {
                        warn!("[{label}] ping send error: {e}");
                        break;
                    }
                }
            }
        }

        // Disconnected — back off, then reconnect at the top of the outer loop.
        reconnecting = true;
        let _ = state_tx.send(SessionState::Reconnecting);
        warn!(
            "[{label}] disconnected, reconnecting in {:?}",
            config.reconnect_delay
        );
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect_delay) => {}
            _ = shutdown_rx.changed() => {
                let _ = state_tx.send(SessionState::Closed);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_payload_rendering() {
        let text = PingPayload::Text("ping".into()).to_message();
        assert_eq!(text, Message::Text("ping".into()));

        let json = PingPayload::Json(serde_json::json!({"op": "ping"})).to_message();
        assert_eq!(json, Message::Text(r#"{"op":"ping"}"#.into()));
    }

    #[tokio::test]
    async fn unstarted_session_is_idle_and_stop_is_idempotent() {
        let mut session = WsSession::new(WsSessionConfig {
            url: "wss://example.invalid/ws".into(),
            ping_interval: None,
            ping_payload: None,
            reconnect_delay: Duration::from_secs(5),
            resubscribe_settle: Duration::from_secs(4),
            label: "TEST".into(),
        });
        assert_eq!(session.state(), SessionState::Idle);
        // send() before start is a no-op rather than an error.
        session.send("{}".into()).await.unwrap();
        session.stop().await;
        session.stop().await;
    }
}
