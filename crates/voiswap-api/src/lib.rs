//! voiswap-api: HTTP API layer
//!
//! Thin axum surface over the router: request validation, error mapping, and
//! response shaping. All routing logic lives in the `router` crate.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, start_server};
pub use state::AppState;
