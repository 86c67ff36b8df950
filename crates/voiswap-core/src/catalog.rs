//! Pool catalog and token metadata
//!
//! Loaded once at startup from JSON files and treated as immutable for the
//! process lifetime. The catalog describes which pools exist and how their
//! on-chain tokens map to the underlying tokens users hold.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::types::{AppId, Dex, TokenId, TokenKind};

/// A HumbleSwap pool trades two wrapped ARC200 contracts. Underlying native
/// or ASA tokens are shuttled in and out through the wrapped shims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumblePoolConfig {
    /// Wrapped token contract on the A side
    pub tok_a: AppId,
    /// Wrapped token contract on the B side
    pub tok_b: AppId,
    /// underlying token id -> wrapped contract id
    #[serde(default, with = "string_keyed_map")]
    pub underlying_to_wrapped: HashMap<u64, AppId>,
    /// Wrapped contracts that support withdrawal back to their underlying
    #[serde(default)]
    pub unwrap: HashSet<AppId>,
}

/// JSON object keys are strings, and the tagged-enum deserializer this config
/// rides through does not convert them back to integers on its own.
mod string_keyed_map {
    use std::collections::HashMap;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &HashMap<u64, u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        map.iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<HashMap<String, u64>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<u64, u64>, D::Error> {
        let raw = HashMap::<String, u64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(k, v)| {
                k.parse::<u64>()
                    .map(|k| (k, v))
                    .map_err(|_| D::Error::custom(format!("non-numeric token id key: {}", k)))
            })
            .collect()
    }
}

impl HumblePoolConfig {
    /// The underlying token a wrapped contract stands for. A wrapped contract
    /// with no underlying mapping is itself the tradeable token (pure ARC200).
    pub fn underlying_for(&self, wrapped: AppId) -> TokenId {
        self.underlying_to_wrapped
            .iter()
            .find(|(_, w)| **w == wrapped)
            .map(|(u, _)| *u)
            .unwrap_or(wrapped)
    }

    /// The wrapped contract that holds deposits of `underlying` in this pool,
    /// if the pool trades it on either side.
    pub fn wrapped_for(&self, underlying: TokenId) -> Option<AppId> {
        if let Some(w) = self.underlying_to_wrapped.get(&underlying) {
            return Some(*w);
        }
        // Pure ARC200: the token is its own wrapped form
        if underlying == self.tok_a || underlying == self.tok_b {
            return Some(underlying);
        }
        None
    }
}

/// One side of a Nomadex pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NomadexToken {
    pub id: u64,
    pub kind: TokenKind,
}

/// A Nomadex pool trades two tokens directly (native, ASA, or ARC200).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NomadexPoolConfig {
    pub tok_a: NomadexToken,
    pub tok_b: NomadexToken,
}

/// DEX-specific pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "dex", rename_all = "lowercase")]
pub enum PoolVariant {
    Humbleswap(HumblePoolConfig),
    Nomadex(NomadexPoolConfig),
}

/// Static configuration of a single pool, from the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    pub pool_id: u64,
    /// Fee override in basis points; `None` means read it from chain state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_bps: Option<u32>,
    #[serde(flatten)]
    pub variant: PoolVariant,
}

impl PoolConfig {
    pub fn dex(&self) -> Dex {
        match self.variant {
            PoolVariant::Humbleswap(_) => Dex::Humbleswap,
            PoolVariant::Nomadex(_) => Dex::Nomadex,
        }
    }

    /// The two underlying tokens this pool trades.
    pub fn underlying_pair(&self) -> (TokenId, TokenId) {
        match &self.variant {
            PoolVariant::Humbleswap(cfg) => {
                (cfg.underlying_for(cfg.tok_a), cfg.underlying_for(cfg.tok_b))
            }
            PoolVariant::Nomadex(cfg) => (cfg.tok_a.id, cfg.tok_b.id),
        }
    }

    /// Whether this pool trades the (unordered) token pair.
    pub fn covers(&self, a: TokenId, b: TokenId) -> bool {
        let (pa, pb) = self.underlying_pair();
        (pa == a && pb == b) || (pa == b && pb == a)
    }
}

/// Token display metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    /// For wrapped entries: the contract id holding the wrapped form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u64>,
}

/// The full pool catalog, immutable after startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolCatalog {
    pub pools: Vec<PoolConfig>,
    pub tokens: HashMap<u64, TokenInfo>,
}

impl PoolCatalog {
    /// Load the catalog from the pools and tokens JSON files.
    pub fn load(pools_path: &Path, tokens_path: &Path) -> Result<Self> {
        let pools_raw = std::fs::read_to_string(pools_path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", pools_path.display(), e)))?;
        let tokens_raw = std::fs::read_to_string(tokens_path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", tokens_path.display(), e)))?;

        let pools: Vec<PoolConfig> = serde_json::from_str(&pools_raw)
            .map_err(|e| Error::Serialization(format!("pools file: {}", e)))?;
        let tokens: HashMap<u64, TokenInfo> = serde_json::from_str(&tokens_raw)
            .map_err(|e| Error::Serialization(format!("tokens file: {}", e)))?;

        Ok(Self { pools, tokens })
    }

    pub fn pool(&self, pool_id: u64) -> Option<&PoolConfig> {
        self.pools.iter().find(|p| p.pool_id == pool_id)
    }

    pub fn token(&self, token_id: TokenId) -> Option<&TokenInfo> {
        self.tokens.get(&token_id)
    }
}
