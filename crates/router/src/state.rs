//! Routing data structures
//!
//! Everything here lives for a single request: routes found by the planner,
//! per-hop splits chosen by the optimizer, and the final plan handed to the
//! group builder.

use serde::Serialize;

use voiswap_core::{PoolConfig, TokenId};

/// A token path plus every pool covering each hop
#[derive(Debug, Clone)]
pub struct Route {
    /// Underlying token sequence, length = hops + 1
    pub tokens: Vec<TokenId>,
    /// `pool_options[i]` lists every pool trading (tokens[i], tokens[i+1])
    pub pool_options: Vec<Vec<PoolConfig>>,
}

impl Route {
    pub fn hops(&self) -> usize {
        self.pool_options.len()
    }

    pub fn source(&self) -> TokenId {
        self.tokens[0]
    }

    pub fn target(&self) -> TokenId {
        *self.tokens.last().expect("route has at least two tokens")
    }
}

/// Quote for a single pool at a given input
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoolQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    pub min_out: u64,
    pub price_impact: f64,
}

/// One leg of a hop's split
#[derive(Debug, Clone, Serialize)]
pub struct PoolSlice {
    pub pool: PoolConfig,
    pub amount_in: u64,
    pub expected_out: u64,
    pub min_out: u64,
    pub quote: PoolQuote,
}

/// A hop's input distributed across its pool options
#[derive(Debug, Clone, Serialize)]
pub struct HopSplit {
    pub from: TokenId,
    pub to: TokenId,
    /// Hop input; slice inputs sum to this exactly
    pub amount_in: u64,
    pub slices: Vec<PoolSlice>,
    /// Input-weighted price impact of this hop
    pub price_impact: f64,
}

impl HopSplit {
    pub fn total_out(&self) -> u64 {
        self.slices.iter().map(|s| s.expected_out).sum()
    }

    pub fn total_min_out(&self) -> u64 {
        self.slices.iter().map(|s| s.min_out).sum()
    }
}

/// Fee skimmed from the routing gain over the best single-pool trade
#[derive(Debug, Clone, Serialize)]
pub struct PlatformFee {
    /// Extra output the multi-pool plan produced vs the single-pool baseline
    pub gain: u64,
    pub fee_amount: u64,
    pub fee_bps: u32,
    pub fee_address: String,
    /// True only when a non-zero fee is actually skimmed
    pub applied: bool,
}

/// The chosen plan: ordered hop splits plus totals
///
/// `price_impact` is the arithmetic sum of per-hop weighted impacts, matching
/// how the quote is presented to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedSwap {
    pub hops: Vec<HopSplit>,
    pub total_input: u64,
    pub total_output: u64,
    pub total_min_output: u64,
    pub price_impact: f64,
    pub platform_fee: Option<PlatformFee>,
}

impl PlannedSwap {
    /// Number of distinct pool slices across all hops
    pub fn pool_count(&self) -> usize {
        self.hops.iter().map(|h| h.slices.len()).sum()
    }

    pub fn final_hop(&self) -> &HopSplit {
        self.hops.last().expect("planned swap has at least one hop")
    }
}
