//! Startup symbol discovery.
//!
//! One HTTP GET per venue, decoded through a pure extractor so the schema
//! handling stays testable without a network. Failures are logged and yield
//! an empty list — a venue with no symbols simply contributes no
//! subscriptions, it never aborts startup.

use std::collections::HashMap;

use anyhow::{Result, bail};
use serde_json::Value;
use sf_core::types::Venue;
use tracing::{error, info};

const BITGET_CONTRACTS_URL: &str = "https://api.bitget.com/api/mix/v1/market/contracts";
const GATE_CONTRACTS_URL: &str = "https://api.gateio.ws/api/v4/futures/usdt/contracts";
const BYBIT_TICKERS_URL: &str = "https://api.bybit.com/v5/market/tickers";
const OKX_MARK_PRICE_URL: &str = "https://www.okx.com/api/v5/public/mark-price";
const LBANK_PAIRS_URL: &str = "https://api.lbkex.com/v2/currencyPairs.do";

/// Fetch every venue's tradable symbols, concurrently.
///
/// `None` means "subscribe to everything the adapter can request": MEXC has
/// an all-tickers channel and needs no catalog; BingX has neither a catalog
/// here nor an all-tickers channel and ends up subscribing to nothing.
pub async fn fetch_all(client: &reqwest::Client) -> HashMap<Venue, Option<Vec<String>>> {
    let (bitget, gate, bybit, okx, lbank) = tokio::join!(
        fetch_bitget_symbols(client),
        fetch_gate_symbols(client),
        fetch_bybit_symbols(client),
        fetch_okx_symbols(client),
        fetch_lbank_symbols(client),
    );

    HashMap::from([
        (Venue::Mexc, None),
        (Venue::Bingx, None),
        (Venue::Bitget, Some(bitget)),
        (Venue::Gate, Some(gate)),
        (Venue::Bybit, Some(bybit)),
        (Venue::Okx, Some(okx)),
        (Venue::Lbank, Some(lbank)),
    ])
}

/// Bitget USDT-margined contracts, as `{baseCoin}_{quoteCoin}`.
pub async fn fetch_bitget_symbols(client: &reqwest::Client) -> Vec<String> {
    fetch(client, Venue::Bitget, BITGET_CONTRACTS_URL, &[("productType", "umcbl")], extract_bitget_symbols).await
}

/// Gate USDT futures contract names (`BTC_USDT`).
pub async fn fetch_gate_symbols(client: &reqwest::Client) -> Vec<String> {
    fetch(client, Venue::Gate, GATE_CONTRACTS_URL, &[], extract_gate_symbols).await
}

/// Bybit linear symbols (`BTCUSDT`).
pub async fn fetch_bybit_symbols(client: &reqwest::Client) -> Vec<String> {
    fetch(client, Venue::Bybit, BYBIT_TICKERS_URL, &[("category", "linear")], extract_bybit_symbols).await
}

/// OKX swap instIds (`BTC-USDT-SWAP`).
pub async fn fetch_okx_symbols(client: &reqwest::Client) -> Vec<String> {
    fetch(client, Venue::Okx, OKX_MARK_PRICE_URL, &[("instType", "SWAP")], extract_okx_symbols).await
}

/// LBank pairs (`BTC_USDT`).
pub async fn fetch_lbank_symbols(client: &reqwest::Client) -> Vec<String> {
    fetch(client, Venue::Lbank, LBANK_PAIRS_URL, &[], extract_lbank_symbols).await
}

/// GET + decode + extract, with the venue's failure policy applied.
async fn fetch(
    client: &reqwest::Client,
    venue: Venue,
    url: &str,
    query: &[(&str, &str)],
    extract: fn(&Value) -> Option<Vec<String>>,
) -> Vec<String> {
    match get_json(client, url, query).await {
        Ok(body) => match extract(&body) {
            Some(symbols) => {
                info!("fetched {} symbols from {venue}", symbols.len());
                symbols
            }
            None => {
                error!("unexpected catalog response from {venue}: {body}");
                Vec::new()
            }
        },
        Err(e) => {
            error!("{venue} catalog fetch failed: {e}");
            Vec::new()
        }
    }
}

async fn get_json(client: &reqwest::Client, url: &str, query: &[(&str, &str)]) -> Result<Value> {
    let mut request = client.get(url);
    if !query.is_empty() {
        request = request.query(query);
    }
    let response = request.send().await?;
    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }
    Ok(response.json().await?)
}

// ---------------------------------------------------------------------------
// Pure extractors
// ---------------------------------------------------------------------------

fn extract_bitget_symbols(body: &Value) -> Option<Vec<String>> {
    if body.get("code").and_then(Value::as_str) != Some("00000") {
        return None;
    }
    let data = body.get("data")?.as_array()?;
    Some(
        data.iter()
            .filter_map(|item| {
                let base = item.get("baseCoin")?.as_str()?;
                let quote = item.get("quoteCoin")?.as_str()?;
                Some(format!("{base}_{quote}"))
            })
            .collect(),
    )
}

fn extract_gate_symbols(body: &Value) -> Option<Vec<String>> {
    let contracts = body.as_array()?;
    Some(
        contracts
            .iter()
            .filter_map(|item| item.get("name")?.as_str())
            .map(str::to_uppercase)
            .collect(),
    )
}

fn extract_bybit_symbols(body: &Value) -> Option<Vec<String>> {
    let list = body.get("result")?.get("list")?.as_array()?;
    Some(
        list.iter()
            .filter_map(|item| item.get("symbol")?.as_str())
            .map(str::to_uppercase)
            .collect(),
    )
}

fn extract_okx_symbols(body: &Value) -> Option<Vec<String>> {
    let data = body.get("data")?.as_array()?;
    Some(
        data.iter()
            .filter_map(|item| item.get("instId")?.as_str())
            .map(str::to_uppercase)
            .collect(),
    )
}

fn extract_lbank_symbols(body: &Value) -> Option<Vec<String>> {
    if body.get("msg").and_then(Value::as_str) != Some("Success") {
        return None;
    }
    let data = body.get("data")?.as_array()?;
    Some(
        data.iter()
            .filter_map(Value::as_str)
            .map(str::to_uppercase)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bitget_assembles_base_and_quote() {
        let body = json!({
            "code": "00000",
            "data": [
                {"baseCoin": "BTC", "quoteCoin": "USDT"},
                {"baseCoin": "ETH", "quoteCoin": "USDT"},
                {"symbol": "no-coins-here"},
            ]
        });
        assert_eq!(
            extract_bitget_symbols(&body).unwrap(),
            vec!["BTC_USDT", "ETH_USDT"]
        );
        assert!(extract_bitget_symbols(&json!({"code": "40001", "msg": "err"})).is_none());
    }

    #[test]
    fn gate_reads_contract_names() {
        let body = json!([{"name": "btc_usdt"}, {"name": "ETH_USDT"}]);
        assert_eq!(
            extract_gate_symbols(&body).unwrap(),
            vec!["BTC_USDT", "ETH_USDT"]
        );
        assert!(extract_gate_symbols(&json!({"message": "oops"})).is_none());
    }

    #[test]
    fn bybit_reads_result_list() {
        let body = json!({
            "retCode": 0,
            "result": {"category": "linear", "list": [{"symbol": "BTCUSDT"}, {"symbol": "ETHUSDT"}]}
        });
        assert_eq!(
            extract_bybit_symbols(&body).unwrap(),
            vec!["BTCUSDT", "ETHUSDT"]
        );
    }

    #[test]
    fn okx_reads_inst_ids() {
        let body = json!({
            "code": "0",
            "data": [{"instId": "BTC-USDT-SWAP", "instType": "SWAP"}, {"instId": "ETH-USDT-SWAP"}]
        });
        assert_eq!(
            extract_okx_symbols(&body).unwrap(),
            vec!["BTC-USDT-SWAP", "ETH-USDT-SWAP"]
        );
    }

    #[test]
    fn lbank_requires_success_and_uppercases() {
        let body = json!({"msg": "Success", "data": ["btc_usdt", "eth_usdt"]});
        assert_eq!(
            extract_lbank_symbols(&body).unwrap(),
            vec!["BTC_USDT", "ETH_USDT"]
        );
        assert!(extract_lbank_symbols(&json!({"msg": "Error", "data": []})).is_none());
    }
}
