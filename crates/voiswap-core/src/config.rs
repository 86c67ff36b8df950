//! Configuration types for Voiswap

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Node (algod) base URL
    #[serde(default = "default_algod_url")]
    pub algod_url: String,

    /// Indexer base URL
    #[serde(default = "default_indexer_url")]
    pub indexer_url: String,

    /// Platform fee on routing gain, in basis points (0 disables)
    #[serde(default)]
    pub platform_fee_bps: u32,

    /// Destination address for the platform fee
    #[serde(default)]
    pub platform_fee_address: Option<String>,

    /// Path to the pool catalog file
    #[serde(default = "default_pools_file")]
    pub pools_file: String,

    /// Path to the token metadata file
    #[serde(default = "default_tokens_file")]
    pub tokens_file: String,
}

fn default_port() -> u16 {
    3000
}

fn default_algod_url() -> String {
    "https://mainnet-api.voi.nodely.dev".to_string()
}

fn default_indexer_url() -> String {
    "https://mainnet-idx.voi.nodely.dev".to_string()
}

fn default_pools_file() -> String {
    "config/pools.json".to_string()
}

fn default_tokens_file() -> String {
    "config/tokens.json".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            algod_url: default_algod_url(),
            indexer_url: default_indexer_url(),
            platform_fee_bps: 0,
            platform_fee_address: None,
            pools_file: default_pools_file(),
            tokens_file: default_tokens_file(),
        }
    }
}

impl AppConfig {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_parse("PORT") {
            config.port = port;
        }
        if let Ok(url) = std::env::var("ALGOD_URL") {
            config.algod_url = url;
        }
        if let Ok(url) = std::env::var("INDEXER_URL") {
            config.indexer_url = url;
        }
        if let Some(bps) = env_parse("PLATFORM_FEE_BPS") {
            config.platform_fee_bps = bps;
        }
        if let Ok(addr) = std::env::var("PLATFORM_FEE_ADDRESS") {
            if !addr.is_empty() {
                config.platform_fee_address = Some(addr);
            }
        }
        if let Ok(path) = std::env::var("POOLS_FILE") {
            config.pools_file = path;
        }
        if let Ok(path) = std::env::var("TOKENS_FILE") {
            config.tokens_file = path;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.platform_fee_bps, 0);
        assert!(config.platform_fee_address.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.algod_url, config.algod_url);
        assert_eq!(parsed.port, config.port);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"port": 8080}"#).unwrap();
        assert_eq!(parsed.port, 8080);
        assert_eq!(parsed.pools_file, "config/pools.json");
    }
}
