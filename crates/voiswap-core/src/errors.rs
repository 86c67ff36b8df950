//! Error types for Voiswap

use thiserror::Error;

/// Core errors that can occur in Voiswap
#[derive(Debug, Error)]
pub enum Error {
    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Transaction error: {0}")]
    Build(#[from] BuildError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Node connection and query errors
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Node unreachable at {url}")]
    Unreachable { url: String },

    #[error("Node returned error: {message}")]
    ApiError { message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Deadline exceeded while {what}")]
    Timeout { what: &'static str },

    #[error("Application {app_id} has no box {name}")]
    BoxNotFound { app_id: u64, name: String },

    #[error("Asset not found: {asset_id}")]
    AssetNotFound { asset_id: u64 },
}

/// Quote planning errors
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("No route from {from} to {to}")]
    NoRoute { from: u64, to: u64 },

    #[error("Pool state unavailable: {reason}")]
    PoolStateUnavailable { reason: String },
}

/// Transaction building errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Failed to build transaction group: {message}")]
    BuildFailed { message: String },

    #[error("Failed to encode transaction: {message}")]
    EncodingFailed { message: String },
}

/// Result type alias for Voiswap operations
pub type Result<T> = std::result::Result<T, Error>;

impl PlanError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::NoRoute { .. } => "no_route",
            Self::PoolStateUnavailable { .. } => "pool_state_unavailable",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest { .. } | Self::NoRoute { .. } => 400,
            Self::PoolStateUnavailable { .. } => 500,
        }
    }
}
