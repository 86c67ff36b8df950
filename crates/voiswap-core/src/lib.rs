//! voiswap-core: Shared types, errors, and configuration
//!
//! This crate provides the foundational types used across the Voiswap
//! workspace, plus the chain-gateway trait the planner and adapters consume.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod types;

pub use catalog::*;
pub use config::*;
pub use errors::*;
pub use gateway::*;
pub use types::*;
