//! Deposit/withdraw availability probes.
//!
//! A spread is only actionable when the base coin can actually move: bought
//! where deposits are open, sold where withdrawals are open. Most venues do
//! not expose a public status endpoint and report `(true, true)`; Gate and
//! MEXC are queried for real, per chain, with every failure path degrading
//! to the conservative `(false, false)`.

use std::sync::Once;

use anyhow::{Result, bail};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sf_core::time_util;
use sf_core::types::symbol::strip_usdt_suffix;
use sha2::Sha256;
use tracing::{error, warn};

type HmacSha256 = Hmac<Sha256>;

const GATE_CHAINS_URL: &str = "https://api.gateio.ws/api/v4/wallet/currency_chains";
const MEXC_CAPITAL_URL: &str = "https://api.mexc.com/api/v3/capital/config/getall";

/// How a venue answers deposit/withdraw status queries.
pub enum WalletProbe {
    /// Venues that do not gate transfers per contract report open/open.
    AlwaysOpen,
    /// No status endpoint at all — answer the conservative closed/closed.
    Unsupported,
    /// Gate's public per-chain wallet endpoint.
    Gate,
    /// MEXC's signed capital endpoint; credentials come from the environment.
    Mexc(MexcCredentials),
}

/// API credentials for the signed MEXC wallet endpoint.
pub struct MexcCredentials {
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl MexcCredentials {
    /// Read `MEXC_API_KEY` / `MEXC_API_SECRET`. Either may be absent; status
    /// queries then answer closed without failing the process.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("MEXC_API_KEY").ok(),
            api_secret: std::env::var("MEXC_API_SECRET").ok(),
        }
    }
}

impl WalletProbe {
    /// `(deposit_open, withdraw_open)` for a canonical symbol.
    pub async fn status(&self, client: &reqwest::Client, symbol: &str) -> (bool, bool) {
        match self {
            WalletProbe::AlwaysOpen => (true, true),
            WalletProbe::Unsupported => (false, false),
            WalletProbe::Gate => match gate_status(client, symbol).await {
                Ok(status) => status,
                Err(e) => {
                    error!("gate wallet status for {symbol} failed: {e}");
                    (false, false)
                }
            },
            WalletProbe::Mexc(credentials) => mexc_status(client, credentials, symbol).await,
        }
    }
}

async fn gate_status(client: &reqwest::Client, symbol: &str) -> Result<(bool, bool)> {
    let base = strip_usdt_suffix(symbol);
    let response = client
        .get(GATE_CHAINS_URL)
        .query(&[("currency", base.as_str())])
        .send()
        .await?;
    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }
    let chains: Value = response.json().await?;
    Ok(or_gate_chains(&chains))
}

/// OR deposit/withdraw status across all of a coin's chains.
///
/// Gate reports *disabled* flags per chain; one enabled chain in either
/// direction is enough.
fn or_gate_chains(chains: &Value) -> (bool, bool) {
    let mut deposit_open = false;
    let mut withdraw_open = false;
    if let Some(list) = chains.as_array() {
        for chain in list {
            if chain.get("is_deposit_disabled").and_then(Value::as_i64) == Some(0) {
                deposit_open = true;
            }
            if chain.get("is_withdraw_disabled").and_then(Value::as_i64) == Some(0) {
                withdraw_open = true;
            }
            if deposit_open && withdraw_open {
                break;
            }
        }
    }
    (deposit_open, withdraw_open)
}

async fn mexc_status(
    client: &reqwest::Client,
    credentials: &MexcCredentials,
    symbol: &str,
) -> (bool, bool) {
    let (Some(key), Some(secret)) = (&credentials.api_key, &credentials.api_secret) else {
        static MISSING: Once = Once::new();
        MISSING.call_once(|| {
            warn!("MEXC_API_KEY/MEXC_API_SECRET not set; MEXC deposit/withdraw reported closed");
        });
        return (false, false);
    };

    match mexc_fetch(client, key, secret, symbol).await {
        Ok(status) => status,
        Err(e) => {
            error!("mexc wallet status for {symbol} failed: {e}");
            (false, false)
        }
    }
}

async fn mexc_fetch(
    client: &reqwest::Client,
    key: &str,
    secret: &str,
    symbol: &str,
) -> Result<(bool, bool)> {
    let query = format!("timestamp={}", time_util::now_ms());
    let signature = hmac_sha256_sign(secret, &query);
    let url = format!("{MEXC_CAPITAL_URL}?{query}&signature={signature}");

    let response = client.get(url).header("X-MEXC-APIKEY", key).send().await?;
    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }
    let coins: Value = response.json().await?;
    Ok(or_mexc_networks(&coins, &strip_usdt_suffix(symbol)))
}

/// OR deposit/withdraw status across a coin's network entries.
fn or_mexc_networks(coins: &Value, base: &str) -> (bool, bool) {
    let mut deposit_open = false;
    let mut withdraw_open = false;

    let Some(list) = coins.as_array() else {
        return (false, false);
    };
    let coin = list
        .iter()
        .find(|c| c.get("coin").and_then(Value::as_str) == Some(base));
    let Some(networks) = coin.and_then(|c| c.get("networkList")).and_then(Value::as_array) else {
        return (false, false);
    };

    for network in networks {
        if network.get("depositEnable").and_then(Value::as_bool) == Some(true) {
            deposit_open = true;
        }
        if network.get("withdrawEnable").and_then(Value::as_bool) == Some(true) {
            withdraw_open = true;
        }
        if deposit_open && withdraw_open {
            break;
        }
    }
    (deposit_open, withdraw_open)
}

/// Compute an HMAC-SHA256 signature and return it as a lowercase hex string.
fn hmac_sha256_sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
