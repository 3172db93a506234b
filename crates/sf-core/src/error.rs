//! Typed error definitions for the spreadfeed system.
//!
//! Provides [`FeedError`] for domain-specific errors that are more informative
//! than plain `anyhow::Error` strings. All variants implement `std::error::Error`
//! via `thiserror`, so they integrate seamlessly with `anyhow::Result`.

use thiserror::Error;

/// Domain-specific errors for the spreadfeed system.
///
/// The variants mirror the failure taxonomy: transient transport problems
/// trigger reconnects, decode problems discard one frame, config and catalog
/// problems degrade to defaults. None of them is fatal past bootstrap.
#[derive(Debug, Error)]
pub enum FeedError {
    /// WebSocket connection, handshake, or communication error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Ticker frame parsing or schema error.
    #[error("decode error: {0}")]
    Decode(String),

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Symbol catalog fetch error.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Deposit/withdraw status lookup error.
    #[error("wallet error: {0}")]
    Wallet(String),
}
