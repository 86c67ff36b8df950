//! The quote endpoint
//!
//! Validates the request, runs the planner, and assembles the transaction
//! group when an address is supplied. Assembly failures degrade to a valid
//! quote with an empty transaction list (the client may retry without an
//! address).

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use avm_tx::decode_address;
use router::{
    build_pool_graph, build_swap_group, find_routes, plan_best_swap, prefetch_pool_states, Route,
    RoutePlan,
};
use voiswap_core::constants::{DEFAULT_DECIMALS, MAX_HOPS};
use voiswap_core::{Address, PlanError, SwapContext, TokenId};

use crate::dto::{ApiError, PlatformFeeDto, QuoteDto, QuoteRequest, QuoteResponse};
use crate::AppState;

/// Deadline for each pool state read in the prefetch fan-out
const POOL_READ_DEADLINE: Duration = Duration::from_secs(5);

type Rejection = (StatusCode, Json<ApiError>);

fn bad_request(message: impl Into<String>) -> Rejection {
    (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message)))
}

fn plan_rejection(e: PlanError) -> Rejection {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::new(e.error_code(), e.to_string())))
}

/// POST /quote - Quote a swap and build the executing transaction group
pub async fn post_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, Rejection> {
    if request.amount == 0 {
        return Err(bad_request("amount must be positive"));
    }
    if request.input_token == request.output_token {
        return Err(bad_request("input and output tokens must differ"));
    }
    let slippage = request.slippage_tolerance.unwrap_or(0.005);
    if !(0.0..1.0).contains(&slippage) {
        return Err(bad_request("slippageTolerance must be in [0, 1)"));
    }

    let routes = candidate_routes(&state, &request)?;

    let states = prefetch_pool_states(state.gateway(), &routes, POOL_READ_DEADLINE).await;

    let config = state.config();
    let plan = plan_best_swap(
        request.input_token,
        request.output_token,
        &routes,
        &states,
        request.amount,
        slippage,
        config.platform_fee_bps,
        config.platform_fee_address.as_deref(),
    )
    .map_err(plan_rejection)?;

    // Assembly is best-effort: a quote without transactions is still useful
    let (unsigned_transactions, network_fee, error) = match &request.address {
        Some(address) => build_group(&state, address, request.degen, &plan).await,
        None => (Vec::new(), 0, None),
    };

    let rate = decimal_rate(
        &state,
        request.input_token,
        request.output_token,
        request.amount,
        plan.planned.total_output,
    );

    let pool_id = single_pool_id(&plan);
    let platform_fee = plan.planned.platform_fee.as_ref().map(|f| PlatformFeeDto {
        gain: f.gain,
        fee_amount: f.fee_amount,
        fee_bps: f.fee_bps,
        fee_address: f.fee_address.clone(),
        applied: f.applied,
    });

    Ok(Json(QuoteResponse {
        quote: QuoteDto {
            input_amount: request.amount,
            output_amount: plan.planned.total_output,
            minimum_output_amount: plan.planned.total_min_output,
            rate,
            price_impact: plan.planned.price_impact,
            network_fee,
        },
        route: crate::dto::route_dto(&plan),
        unsigned_transactions,
        pool_id,
        platform_fee,
        error,
    }))
}

fn candidate_routes(state: &AppState, request: &QuoteRequest) -> Result<Vec<Route>, Rejection> {
    let catalog = state.catalog();

    if let Some(pool_id) = request.pool_id {
        let pool = catalog.pool(pool_id).ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::not_found(format!("Pool not found: {}", pool_id))),
            )
        })?;
        if !pool.covers(request.input_token, request.output_token) {
            return Err(bad_request(format!(
                "pool {} does not trade the requested pair",
                pool_id
            )));
        }
        return Ok(vec![Route {
            tokens: vec![request.input_token, request.output_token],
            pool_options: vec![vec![pool.clone()]],
        }]);
    }

    let graph = build_pool_graph(&catalog.pools, request.dex);
    let routes = find_routes(&graph, request.input_token, request.output_token, MAX_HOPS);
    if routes.is_empty() {
        let e = PlanError::NoRoute {
            from: request.input_token,
            to: request.output_token,
        };
        return Err(plan_rejection(e));
    }
    Ok(routes)
}

async fn build_group(
    state: &AppState,
    address: &str,
    degen: bool,
    plan: &RoutePlan,
) -> (Vec<String>, u64, Option<String>) {
    let degraded = |message: String| {
        tracing::warn!(error = %message, "transaction assembly failed, returning quote only");
        (Vec::new(), 0, Some(message))
    };

    let sender_pk = match decode_address(address) {
        Ok(pk) => pk,
        Err(e) => return degraded(format!("invalid address: {}", e)),
    };
    let params = match state.gateway().suggested_params().await {
        Ok(p) => p,
        Err(e) => return degraded(format!("suggested params unavailable: {}", e)),
    };

    let ctx = SwapContext {
        sender: Address::new(address),
        sender_pk,
        params,
        degen,
    };

    match build_swap_group(state.gateway(), &ctx, &plan.planned).await {
        Ok(built) => (built.encoded, built.network_fee, None),
        Err(e) => degraded(e.to_string()),
    }
}

fn decimal_rate(
    state: &AppState,
    input: TokenId,
    output: TokenId,
    amount_in: u64,
    amount_out: u64,
) -> f64 {
    if amount_in == 0 {
        return 0.0;
    }
    let decimals = |t: TokenId| {
        state
            .catalog()
            .token(t)
            .map(|info| info.decimals)
            .unwrap_or(DEFAULT_DECIMALS) as i32
    };
    let scale = 10f64.powi(decimals(input) - decimals(output));
    amount_out as f64 / amount_in as f64 * scale
}

fn single_pool_id(plan: &RoutePlan) -> Option<u64> {
    if plan.planned.pool_count() == 1 {
        plan.planned
            .hops
            .first()
            .and_then(|h| h.slices.first())
            .map(|s| s.pool.pool_id)
    } else {
        None
    }
}
