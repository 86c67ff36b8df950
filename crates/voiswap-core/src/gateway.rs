//! Chain gateway trait
//!
//! Read-only view of the chain consumed by the planner and the DEX adapters.
//! The HTTP client in `algod-client` is the production implementation; tests
//! substitute in-memory stubs.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::NodeError;
use crate::types::{AppId, AssetId};

/// Balances held by an account
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    /// Native token balance in microunits
    pub balance: u64,
    /// ASA holdings: asset id -> amount
    pub assets: HashMap<AssetId, u64>,
}

/// A decoded application global-state value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TealValue {
    Uint(u64),
    Bytes(Vec<u8>),
}

impl TealValue {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Uint(_) => None,
        }
    }
}

/// Suggested transaction parameters from the node
#[derive(Debug, Clone)]
pub struct SuggestedParams {
    pub fee: u64,
    pub min_fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
}

/// Per-request context handed to the adapters' swap builders
#[derive(Debug, Clone)]
pub struct SwapContext {
    /// The swapping user's address
    pub sender: crate::types::Address,
    /// The user's decoded public key
    pub sender_pk: [u8; 32],
    /// Suggested params fetched once for the whole group
    pub params: SuggestedParams,
    /// Degen mode: approve max allowance when a prior allowance covers
    pub degen: bool,
}

/// Read-only chain access. Every method is a suspension point; callers own
/// deadlines via `tokio::time::timeout`.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Native balance and ASA holdings of an account
    async fn account_state(&self, address: &str) -> Result<AccountState, NodeError>;

    /// Raw global key-value state of an application
    async fn application_global_state(
        &self,
        app_id: AppId,
    ) -> Result<HashMap<String, TealValue>, NodeError>;

    /// Decimals of an asset; 6 for the native token and for unknown assets.
    /// Implementations cache results process-wide (decimals are immutable).
    async fn asset_decimals(&self, asset_id: AssetId) -> Result<u32, NodeError>;

    /// ARC200 balance of an address, read from the contract's balance box
    async fn arc200_balance(&self, app_id: AppId, address: &str) -> Result<u64, NodeError>;

    /// ARC200 allowance granted by `owner` to `spender`
    async fn arc200_allowance(
        &self,
        app_id: AppId,
        owner: &str,
        spender: &str,
    ) -> Result<u64, NodeError>;

    /// Current suggested transaction parameters
    async fn suggested_params(&self) -> Result<SuggestedParams, NodeError>;
}
