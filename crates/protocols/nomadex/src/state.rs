//! Nomadex error types

use thiserror::Error;

use voiswap_core::NodeError;

#[derive(Debug, Error)]
pub enum NomadexError {
    #[error("Pool state unavailable: {reason}")]
    StateUnavailable { reason: String },

    #[error("Pool does not trade token {0}")]
    TokenNotInPool(u64),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Transaction build failed: {0}")]
    Build(String),
}
