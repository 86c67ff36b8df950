//! Core type definitions for Voiswap

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token identifier. `0` is the native chain token; any other value is
/// either an ASA id or an ARC200 contract (application) id.
pub type TokenId = u64;

/// The native chain token.
pub const NATIVE_TOKEN: TokenId = 0;

/// Application (smart contract) id
pub type AppId = u64;

/// Standard asset id
pub type AssetId = u64;

/// Block round
pub type Round = u64;

/// Voi address (Base32 with checksum, 58 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported DEX protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dex {
    Humbleswap,
    Nomadex,
}

impl Dex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Humbleswap => "humbleswap",
            Self::Nomadex => "nomadex",
        }
    }
}

impl fmt::Display for Dex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a token is held on chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Native chain token
    Native,
    /// Standard asset
    Asa,
    /// ARC200 contract token
    Arc200,
}

/// Live reserves of a pool, fetched once per planning call.
///
/// `reserve_a` always corresponds to `tok_a` (reconciled against observed
/// balances at fetch time). Token ids are underlying ids in canonical order,
/// which may differ from the catalog's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub fee_bps: u32,
    pub tok_a: TokenId,
    pub tok_b: TokenId,
}

impl PoolState {
    /// (reserve_in, reserve_out) for a swap of `from` into `to`, if the pool
    /// trades that pair.
    pub fn reserves_for(&self, from: TokenId, to: TokenId) -> Option<(u64, u64)> {
        if from == self.tok_a && to == self.tok_b {
            Some((self.reserve_a, self.reserve_b))
        } else if from == self.tok_b && to == self.tok_a {
            Some((self.reserve_b, self.reserve_a))
        } else {
            None
        }
    }
}

/// Constants
pub mod constants {
    /// Basis-point denominator
    pub const BPS_DENOM: u64 = 10_000;

    /// Decimals assumed when an asset's metadata is unavailable
    /// (also the native token's decimals)
    pub const DEFAULT_DECIMALS: u32 = 6;

    /// Longest route the planner will consider
    pub const MAX_HOPS: usize = 2;

    /// Flat per-transaction fee in microunits
    pub const MIN_TXN_FEE: u64 = 1_000;

    /// Cost of funding a per-address balance box on an ARC200 contract
    pub const BALANCE_BOX_COST: u64 = 28_500;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dex_display() {
        assert_eq!(Dex::Humbleswap.as_str(), "humbleswap");
        assert_eq!(Dex::Nomadex.as_str(), "nomadex");
    }

    #[test]
    fn test_dex_serde_lowercase() {
        let d: Dex = serde_json::from_str("\"nomadex\"").unwrap();
        assert_eq!(d, Dex::Nomadex);
        assert_eq!(serde_json::to_string(&Dex::Humbleswap).unwrap(), "\"humbleswap\"");
    }

    #[test]
    fn test_native_token_id() {
        assert_eq!(NATIVE_TOKEN, 0);
    }
}
