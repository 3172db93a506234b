//! Exchange venue identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::FeedError;

/// The exchanges this system can stream from.
///
/// The tag returned by [`Venue::as_str`] is stable and uppercase; it is the
/// `venue` field of every emitted price record and the key under which
/// adapters are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Venue {
    Mexc,
    Bitget,
    Bybit,
    Gate,
    Okx,
    Lbank,
    Bingx,
}

impl Venue {
    /// Every supported venue, in a fixed order.
    pub const ALL: [Venue; 7] = [
        Venue::Mexc,
        Venue::Bitget,
        Venue::Bybit,
        Venue::Gate,
        Venue::Okx,
        Venue::Lbank,
        Venue::Bingx,
    ];

    /// Stable uppercase tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Venue::Mexc => "MEXC",
            Venue::Bitget => "BITGET",
            Venue::Bybit => "BYBIT",
            Venue::Gate => "GATE",
            Venue::Okx => "OKX",
            Venue::Lbank => "LBANK",
            Venue::Bingx => "BINGX",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MEXC" => Ok(Venue::Mexc),
            "BITGET" => Ok(Venue::Bitget),
            "BYBIT" => Ok(Venue::Bybit),
            "GATE" => Ok(Venue::Gate),
            "OKX" => Ok(Venue::Okx),
            "LBANK" => Ok(Venue::Lbank),
            "BINGX" => Ok(Venue::Bingx),
            other => Err(FeedError::Config(format!("unknown venue: {other}"))),
        }
    }
}
