//! API route handlers

pub mod health;
pub mod pools;
pub mod quote;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/quote", post(quote::post_quote))
        .route("/pool/{pool_id}", get(pools::get_pool))
        .route("/config/pools", get(pools::get_pools_config))
        .route("/config/tokens", get(pools::get_tokens_config))
        .with_state(state)
}
