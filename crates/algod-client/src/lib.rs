//! algod-client: HTTP client for the node and indexer REST APIs
//!
//! Production implementation of the `ChainGateway` trait. All methods are
//! plain REST reads; per-request deadlines are owned by callers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;
use tokio::sync::RwLock;

use avm_tx::{decode_address, decode_uint256, BoxName};
use voiswap_core::constants::DEFAULT_DECIMALS;
use voiswap_core::{
    AccountState, AppId, AssetId, ChainGateway, NodeError, SuggestedParams, TealValue,
    NATIVE_TOKEN,
};

/// Flat timeout for a single node API call. Long enough for slow public
/// nodes, short enough that planner deadlines stay meaningful.
const NODE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Validity window length requested for built transactions
const VALIDITY_ROUNDS: u64 = 1_000;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// HTTP client over the node (algod) and indexer REST APIs
#[derive(Clone)]
pub struct AlgodClient {
    http: reqwest::Client,
    algod_url: String,
    indexer_url: String,
    /// Process-wide decimals cache. Decimals are immutable, so entries are
    /// only ever added and never expire.
    decimals: Arc<RwLock<HashMap<AssetId, u32>>>,
}

impl AlgodClient {
    pub fn new(algod_url: impl Into<String>, indexer_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(NODE_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NodeError::ApiError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            algod_url: trim_slash(algod_url.into()),
            indexer_url: trim_slash(indexer_url.into()),
            decimals: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn algod_url(&self) -> &str {
        &self.algod_url
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                NodeError::Unreachable {
                    url: format!("{}: {}", url, e),
                }
            } else {
                NodeError::ApiError {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::ApiError {
                message: format!("{} returned {}", url, status),
            });
        }

        response
            .json()
            .await
            .map_err(|e| NodeError::ParseError(e.to_string()))
    }

    /// Read a single application box by name. 404 maps to `BoxNotFound`.
    async fn get_box(&self, app_id: AppId, name: &[u8]) -> Result<Vec<u8>> {
        let url = format!("{}/v2/applications/{}/box", self.algod_url, app_id);

        let response = self
            .http
            .get(&url)
            .query(&[("name", format!("b64:{}", STANDARD.encode(name)))])
            .send()
            .await
            .map_err(|e| NodeError::ApiError {
                message: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(NodeError::BoxNotFound {
                app_id,
                name: hex::encode(name),
            });
        }
        if !response.status().is_success() {
            return Err(NodeError::ApiError {
                message: format!("box read on app {} returned {}", app_id, response.status()),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| NodeError::ParseError(e.to_string()))?;

        let value = json["value"]
            .as_str()
            .ok_or_else(|| NodeError::ParseError("box response missing value".into()))?;

        STANDARD
            .decode(value)
            .map_err(|e| NodeError::ParseError(format!("box value not base64: {}", e)))
    }

    fn pubkey_of(address: &str) -> Result<[u8; 32]> {
        decode_address(address).map_err(|e| NodeError::ParseError(format!("address: {}", e)))
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Decode a global-state key: UTF-8 where possible, hex otherwise.
fn decode_state_key(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) if s.chars().all(|c| !c.is_control()) => s.to_string(),
        _ => format!("0x{}", hex::encode(raw)),
    }
}

#[async_trait]
impl ChainGateway for AlgodClient {
    async fn account_state(&self, address: &str) -> Result<AccountState> {
        let url = format!("{}/v2/accounts/{}", self.algod_url, address);
        let json = self.get_json(&url).await?;

        let balance = json["amount"].as_u64().unwrap_or(0);
        let mut assets = HashMap::new();
        if let Some(list) = json["assets"].as_array() {
            for entry in list {
                if let (Some(id), Some(amount)) =
                    (entry["asset-id"].as_u64(), entry["amount"].as_u64())
                {
                    assets.insert(id, amount);
                }
            }
        }

        Ok(AccountState { balance, assets })
    }

    async fn application_global_state(
        &self,
        app_id: AppId,
    ) -> Result<HashMap<String, TealValue>> {
        let url = format!("{}/v2/applications/{}", self.algod_url, app_id);
        let json = self.get_json(&url).await?;

        let entries = json["params"]["global-state"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let mut state = HashMap::with_capacity(entries.len());
        for entry in &entries {
            let Some(key_b64) = entry["key"].as_str() else {
                continue;
            };
            let Ok(key_raw) = STANDARD.decode(key_b64) else {
                continue;
            };
            let key = decode_state_key(&key_raw);

            let value = &entry["value"];
            let teal = match value["type"].as_u64() {
                Some(1) => {
                    let raw = value["bytes"]
                        .as_str()
                        .and_then(|b| STANDARD.decode(b).ok())
                        .unwrap_or_default();
                    TealValue::Bytes(raw)
                }
                Some(2) => TealValue::Uint(value["uint"].as_u64().unwrap_or(0)),
                _ => continue,
            };
            state.insert(key, teal);
        }

        Ok(state)
    }

    async fn asset_decimals(&self, asset_id: AssetId) -> Result<u32> {
        if asset_id == NATIVE_TOKEN {
            return Ok(DEFAULT_DECIMALS);
        }

        {
            let cache = self.decimals.read().await;
            if let Some(d) = cache.get(&asset_id) {
                return Ok(*d);
            }
        }

        let node_url = format!("{}/v2/assets/{}", self.algod_url, asset_id);
        let decimals = match self.get_json(&node_url).await {
            Ok(json) => json["params"]["decimals"].as_u64().map(|d| d as u32),
            Err(_) => {
                // Pruned from the node; the indexer keeps full history
                let idx_url = format!("{}/v2/assets/{}", self.indexer_url, asset_id);
                match self.get_json(&idx_url).await {
                    Ok(json) => json["asset"]["params"]["decimals"].as_u64().map(|d| d as u32),
                    Err(e) => {
                        tracing::debug!(asset_id, error = %e, "asset lookup failed, assuming default decimals");
                        None
                    }
                }
            }
        }
        .unwrap_or(DEFAULT_DECIMALS);

        let mut cache = self.decimals.write().await;
        cache.insert(asset_id, decimals);
        Ok(decimals)
    }

    async fn arc200_balance(&self, app_id: AppId, address: &str) -> Result<u64> {
        let pubkey = Self::pubkey_of(address)?;
        let value = self.get_box(app_id, &BoxName::balances(&pubkey)).await?;
        Ok(decode_uint256(&value))
    }

    async fn arc200_allowance(
        &self,
        app_id: AppId,
        owner: &str,
        spender: &str,
    ) -> Result<u64> {
        let owner_pk = Self::pubkey_of(owner)?;
        let spender_pk = Self::pubkey_of(spender)?;
        let value = self
            .get_box(app_id, &BoxName::approvals(&owner_pk, &spender_pk))
            .await?;
        Ok(decode_uint256(&value))
    }

    async fn suggested_params(&self) -> Result<SuggestedParams> {
        let url = format!("{}/v2/transactions/params", self.algod_url);
        let json = self.get_json(&url).await?;

        let last_round = json["last-round"]
            .as_u64()
            .ok_or_else(|| NodeError::ParseError("params missing last-round".into()))?;
        let genesis_hash_b64 = json["genesis-hash"]
            .as_str()
            .ok_or_else(|| NodeError::ParseError("params missing genesis-hash".into()))?;
        let genesis_hash_raw = STANDARD
            .decode(genesis_hash_b64)
            .map_err(|e| NodeError::ParseError(format!("genesis-hash not base64: {}", e)))?;
        let genesis_hash: [u8; 32] = genesis_hash_raw
            .try_into()
            .map_err(|_| NodeError::ParseError("genesis-hash is not 32 bytes".into()))?;

        Ok(SuggestedParams {
            fee: json["fee"].as_u64().unwrap_or(0),
            min_fee: json["min-fee"].as_u64().unwrap_or(1_000),
            first_valid: last_round,
            last_valid: last_round + VALIDITY_ROUNDS,
            genesis_id: json["genesis-id"].as_str().unwrap_or_default().to_string(),
            genesis_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_slash() {
        assert_eq!(trim_slash("http://x/".into()), "http://x");
        assert_eq!(trim_slash("http://x".into()), "http://x");
        assert_eq!(trim_slash("http://x///".into()), "http://x");
    }

    #[test]
    fn test_decode_state_key_utf8() {
        assert_eq!(decode_state_key(b"reserve_a"), "reserve_a");
    }

    #[test]
    fn test_decode_state_key_binary_is_lossless() {
        let key = decode_state_key(&[0x00, 0xff]);
        assert_eq!(key, "0x00ff");
    }
}
