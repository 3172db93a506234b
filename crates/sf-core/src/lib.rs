//! # sf-core
//!
//! Core crate for the spreadfeed system, providing:
//!
//! - **Types** (`types`) — venue tags, price/spread records, symbol normalization
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — domain-specific `FeedError` via thiserror
//! - **WebSocket** (`ws`) — session with keep-alive + fixed-backoff reconnect
//! - **Time utilities** (`time_util`) — epoch timestamps
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;
pub mod ws;

// Re-export types at crate root for convenience.
pub use types::*;
