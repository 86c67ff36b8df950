//! Pool and catalog endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use router::fetch_pool_state;

use crate::dto::{ApiError, PoolStateDto, PoolsConfigResponse, TokensConfigResponse};
use crate::AppState;

/// GET /pool/:pool_id - Live state of one pool
pub async fn get_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<u64>,
) -> Result<Json<PoolStateDto>, (StatusCode, Json<ApiError>)> {
    let pool = state.catalog().pool(pool_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found(format!("Pool not found: {}", pool_id))),
        )
    })?;

    let live = fetch_pool_state(state.gateway(), pool).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("pool_state_unavailable", e.to_string())),
        )
    })?;

    Ok(Json(PoolStateDto {
        pool_id: pool.pool_id,
        dex: pool.dex(),
        tok_a: live.tok_a,
        tok_b: live.tok_b,
        reserve_a: live.reserve_a,
        reserve_b: live.reserve_b,
        fee_bps: live.fee_bps,
    }))
}

/// GET /config/pools - The static pool catalog
pub async fn get_pools_config(State(state): State<AppState>) -> Json<PoolsConfigResponse> {
    let pools = state.catalog().pools.clone();
    let count = pools.len();
    Json(PoolsConfigResponse { pools, count })
}

/// GET /config/tokens - Token metadata
pub async fn get_tokens_config(State(state): State<AppState>) -> Json<TokensConfigResponse> {
    let tokens = state.catalog().tokens.clone();
    let count = tokens.len();
    Json(TokensConfigResponse { tokens, count })
}
