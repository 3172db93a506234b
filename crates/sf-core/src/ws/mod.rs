//! WebSocket session layer with keep-alive and auto-reconnect.

pub mod client;

pub use client::{
    OnTextCallback, PingPayload, SessionState, SubscribeProvider, WsSession, WsSessionConfig,
};
