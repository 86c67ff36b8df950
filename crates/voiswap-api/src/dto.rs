//! Data Transfer Objects for API requests and responses

use serde::{Deserialize, Serialize};

use router::{PlannedSwap, RouteKind, RoutePlan};
use voiswap_core::{Dex, PoolConfig, TokenId, TokenInfo};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("invalid_request", message)
    }
}

/// POST /quote request body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Swapping address; omit for a quote-only response
    #[serde(default)]
    pub address: Option<String>,
    pub input_token: TokenId,
    pub output_token: TokenId,
    pub amount: u64,
    /// Fraction, e.g. 0.01 for 1%. Defaults to 0.5%.
    #[serde(default)]
    pub slippage_tolerance: Option<f64>,
    /// Pin the quote to a single pool
    #[serde(default)]
    pub pool_id: Option<u64>,
    /// Restrict routing to one DEX
    #[serde(default)]
    pub dex: Option<Dex>,
    /// Approve max allowance when a prior allowance already covers
    #[serde(default)]
    pub degen: bool,
}

/// Quote numbers for the client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDto {
    pub input_amount: u64,
    pub output_amount: u64,
    pub minimum_output_amount: u64,
    /// Decimal-adjusted output per input
    pub rate: f64,
    pub price_impact: f64,
    /// Sum of flat transaction fees in the returned group
    pub network_fee: u64,
}

/// One pool leg in the response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolLegDto {
    pub pool_id: u64,
    pub dex: Dex,
    pub input_amount: u64,
    pub output_amount: u64,
    pub minimum_output_amount: u64,
    pub price_impact: f64,
}

/// One hop of a multi-hop route
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHopDto {
    pub from_token: TokenId,
    pub to_token: TokenId,
    pub input_amount: u64,
    pub output_amount: u64,
    pub pools: Vec<PoolLegDto>,
}

/// The chosen route
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    #[serde(rename = "type")]
    pub route_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<PoolLegDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hops: Option<Vec<RouteHopDto>>,
}

/// Platform fee details
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFeeDto {
    pub gain: u64,
    pub fee_amount: u64,
    pub fee_bps: u32,
    pub fee_address: String,
    pub applied: bool,
}

/// POST /quote response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quote: QuoteDto,
    pub unsigned_transactions: Vec<String>,
    pub route: RouteDto,
    pub pool_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_fee: Option<PlatformFeeDto>,
    /// Present when transaction assembly failed but the quote is valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /pool/:poolId response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStateDto {
    pub pool_id: u64,
    pub dex: Dex,
    pub tok_a: TokenId,
    pub tok_b: TokenId,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub fee_bps: u32,
}

/// GET /config/pools response
#[derive(Debug, Clone, Serialize)]
pub struct PoolsConfigResponse {
    pub pools: Vec<PoolConfig>,
    pub count: usize,
}

/// GET /config/tokens response
#[derive(Debug, Clone, Serialize)]
pub struct TokensConfigResponse {
    pub tokens: std::collections::HashMap<u64, TokenInfo>,
    pub count: usize,
}

fn pool_legs(plan: &PlannedSwap, hop_idx: usize) -> Vec<PoolLegDto> {
    plan.hops[hop_idx]
        .slices
        .iter()
        .map(|s| PoolLegDto {
            pool_id: s.pool.pool_id,
            dex: s.pool.dex(),
            input_amount: s.amount_in,
            output_amount: s.expected_out,
            minimum_output_amount: s.min_out,
            price_impact: s.quote.price_impact,
        })
        .collect()
}

/// Shape the route section from a selected plan.
pub fn route_dto(plan: &RoutePlan) -> RouteDto {
    match plan.kind {
        RouteKind::Direct => RouteDto {
            route_type: "direct".to_string(),
            pools: Some(pool_legs(&plan.planned, 0)),
            hops: None,
        },
        RouteKind::MultiHop => RouteDto {
            route_type: "multi-hop".to_string(),
            pools: None,
            hops: Some(
                (0..plan.planned.hops.len())
                    .map(|i| {
                        let hop = &plan.planned.hops[i];
                        RouteHopDto {
                            from_token: hop.from,
                            to_token: hop.to,
                            input_amount: hop.amount_in,
                            output_amount: hop.total_out(),
                            pools: pool_legs(&plan.planned, i),
                        }
                    })
                    .collect(),
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_camel_case() {
        let body = r#"{
            "inputToken": 0,
            "outputToken": 6779767,
            "amount": 10000,
            "slippageTolerance": 0.01
        }"#;
        let request: QuoteRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.input_token, 0);
        assert_eq!(request.output_token, 6779767);
        assert_eq!(request.amount, 10_000);
        assert_eq!(request.slippage_tolerance, Some(0.01));
        assert!(request.address.is_none());
        assert!(!request.degen);
    }

    #[test]
    fn test_route_dto_type_tag() {
        let dto = RouteDto {
            route_type: "direct".into(),
            pools: Some(vec![]),
            hops: None,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "direct");
        assert!(json.get("hops").is_none());
    }

    #[test]
    fn test_health_default() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }
}
