//! Quote engine
//!
//! Per-request state prefetch, single-pool quoting, per-hop split
//! optimization, and multi-hop chaining. All math is pure; the only
//! suspension points are the prefetch fan-out's chain reads.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use voiswap_core::{ChainGateway, PoolConfig, PoolState, TokenId};

use crate::adapters::fetch_pool_state;
use crate::calculator::{compute_output, min_out_with_slippage, price_impact};
use crate::state::{HopSplit, PlannedSwap, PoolQuote, PoolSlice, Route};

/// Allocations this small relative to the hop input collapse to a corner
/// (denominator of the input fraction).
const CORNER_COLLAPSE_DENOM: u64 = 1_000;

/// Per-request pool state cache. Built once by the prefetch fan-out and read
/// only afterwards; pools that failed to read are simply absent.
#[derive(Debug, Default)]
pub struct PoolStates {
    map: HashMap<u64, PoolState>,
}

impl PoolStates {
    pub fn insert(&mut self, pool_id: u64, state: PoolState) {
        self.map.insert(pool_id, state);
    }

    pub fn get(&self, pool_id: u64) -> Option<&PoolState> {
        self.map.get(&pool_id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Pair each pool option with its fetched state, dropping demoted pools.
    pub fn usable(&self, options: &[PoolConfig]) -> Vec<(PoolConfig, PoolState)> {
        options
            .iter()
            .filter_map(|p| self.map.get(&p.pool_id).map(|s| (p.clone(), *s)))
            .collect()
    }
}

/// Concurrently fetch state for every pool reachable from the candidate
/// routes, each read bounded by `deadline`. Failures demote the pool for
/// this request; they never fail the call.
pub async fn prefetch_pool_states(
    gateway: &dyn ChainGateway,
    routes: &[Route],
    deadline: Duration,
) -> PoolStates {
    let mut unique: HashMap<u64, &PoolConfig> = HashMap::new();
    for route in routes {
        for options in &route.pool_options {
            for pool in options {
                unique.entry(pool.pool_id).or_insert(pool);
            }
        }
    }

    let fetches = unique.values().map(|pool| async move {
        let result = tokio::time::timeout(deadline, fetch_pool_state(gateway, pool)).await;
        (pool.pool_id, result)
    });

    let mut states = PoolStates::default();
    for (pool_id, result) in join_all(fetches).await {
        match result {
            Ok(Ok(state)) => states.insert(pool_id, state),
            Ok(Err(e)) => {
                tracing::warn!(pool_id, error = %e, "pool state fetch failed, demoting pool");
            }
            Err(_) => {
                tracing::warn!(pool_id, "pool state fetch missed deadline, demoting pool");
            }
        }
    }
    states
}

/// Quote a single pool. `None` when the pool does not trade the pair or the
/// trade produces nothing.
pub fn quote_pool(
    state: &PoolState,
    from: TokenId,
    to: TokenId,
    amount_in: u64,
    slippage: f64,
) -> Option<PoolQuote> {
    let (reserve_in, reserve_out) = state.reserves_for(from, to)?;
    let amount_out = compute_output(reserve_in, reserve_out, amount_in, state.fee_bps);
    if amount_out == 0 {
        return None;
    }

    Some(PoolQuote {
        amount_in,
        amount_out,
        min_out: min_out_with_slippage(amount_out, slippage),
        price_impact: price_impact(reserve_in, reserve_out, amount_in, amount_out),
    })
}

/// One candidate allocation of the hop input across the option list
struct Evaluated {
    slices: Vec<PoolSlice>,
    total_out: u64,
    impact: f64,
    first_pool: u64,
}

fn evaluate_candidate(
    options: &[(PoolConfig, PoolState)],
    amounts: &[u64],
    from: TokenId,
    to: TokenId,
    slippage: f64,
) -> Option<Evaluated> {
    let total: u64 = amounts.iter().sum();
    let mut slices = Vec::new();
    let mut total_out = 0u64;
    let mut impact = 0.0f64;
    let mut first_pool = u64::MAX;

    for ((pool, state), &amount) in options.iter().zip(amounts) {
        if amount == 0 {
            continue;
        }
        let quote = quote_pool(state, from, to, amount, slippage)?;
        total_out += quote.amount_out;
        impact += quote.price_impact * amount as f64 / total as f64;
        first_pool = first_pool.min(pool.pool_id);
        slices.push(PoolSlice {
            pool: pool.clone(),
            amount_in: amount,
            expected_out: quote.amount_out,
            min_out: quote.min_out,
            quote,
        });
    }

    if slices.is_empty() {
        return None;
    }

    Some(Evaluated {
        slices,
        total_out,
        impact,
        first_pool,
    })
}

/// Closed-form interior optimum for splitting `total` across two pools.
///
/// With `F = 10000 - fee`, `D = reserve_in * 10000`, `K = reserve_out * F * D`,
/// the combined output derivative vanishes at
/// `x* = (sqrt(K1) * D2 + sqrt(K1) * T * F2 - sqrt(K2) * D1)
///       / (sqrt(K2) * F1 + sqrt(K1) * F2)`.
fn two_pool_optimum(
    a: &PoolState,
    b: &PoolState,
    from: TokenId,
    to: TokenId,
    total: u64,
) -> Option<u64> {
    let (rin1, rout1) = a.reserves_for(from, to)?;
    let (rin2, rout2) = b.reserves_for(from, to)?;
    if a.fee_bps >= 10_000 || b.fee_bps >= 10_000 {
        return None;
    }

    let f1 = (10_000 - a.fee_bps) as f64;
    let f2 = (10_000 - b.fee_bps) as f64;
    let d1 = rin1 as f64 * 10_000.0;
    let d2 = rin2 as f64 * 10_000.0;
    let k1 = rout1 as f64 * f1 * d1;
    let k2 = rout2 as f64 * f2 * d2;
    if k1 <= 0.0 || k2 <= 0.0 {
        return None;
    }

    let (s1, s2) = (k1.sqrt(), k2.sqrt());
    let t = total as f64;
    let denominator = s2 * f1 + s1 * f2;
    if denominator <= 0.0 {
        return None;
    }
    let x = (s1 * d2 + s1 * t * f2 - s2 * d1) / denominator;

    Some(x.clamp(0.0, t) as u64)
}

/// Choose the best distribution of a hop's input across its pool options.
///
/// N = 1 is a pass-through, N = 2 uses the closed-form optimum against the
/// two corners, N >= 3 evaluates a fixed coarse candidate list (a heuristic,
/// not an optimum).
pub fn optimize_hop_split(
    options: &[(PoolConfig, PoolState)],
    from: TokenId,
    to: TokenId,
    amount_in: u64,
    slippage: f64,
) -> Option<HopSplit> {
    if options.is_empty() || amount_in == 0 {
        return None;
    }

    let n = options.len();
    let mut candidates: Vec<Vec<u64>> = Vec::new();

    // Corners: everything to one pool
    for i in 0..n {
        let mut amounts = vec![0u64; n];
        amounts[i] = amount_in;
        candidates.push(amounts);
    }

    if n == 2 {
        if let Some(x) = two_pool_optimum(&options[0].1, &options[1].1, from, to, amount_in) {
            let threshold = amount_in / CORNER_COLLAPSE_DENOM;
            // Interior points within 0.1% of a corner collapse to it
            if x > threshold && amount_in - x > threshold {
                candidates.push(vec![x, amount_in - x]);
            }
        }
    } else if n >= 3 {
        let threshold = amount_in / CORNER_COLLAPSE_DENOM;

        // 50/50 over each unordered pair
        for i in 0..n {
            for j in (i + 1)..n {
                let half = amount_in / 2;
                if half < threshold {
                    continue;
                }
                let mut amounts = vec![0u64; n];
                amounts[i] = half;
                amounts[j] = amount_in - half;
                candidates.push(amounts);
            }
        }

        // Equal split across all
        let share = amount_in / n as u64;
        if share >= threshold && share > 0 {
            let mut amounts = vec![share; n];
            // Last pool absorbs the integer remainder
            amounts[n - 1] = amount_in - share * (n as u64 - 1);
            candidates.push(amounts);
        }
    }

    let mut best: Option<Evaluated> = None;
    for amounts in &candidates {
        let Some(evaluated) = evaluate_candidate(options, amounts, from, to, slippage) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some(current) => {
                evaluated.total_out > current.total_out
                    || (evaluated.total_out == current.total_out
                        && (evaluated.impact < current.impact
                            || (evaluated.impact == current.impact
                                && evaluated.first_pool < current.first_pool)))
            }
        };
        if better {
            best = Some(evaluated);
        }
    }

    let best = best?;
    Some(HopSplit {
        from,
        to,
        amount_in,
        price_impact: best.impact,
        slices: best.slices,
    })
}

/// Quote a full route: each hop's input is the sum of the previous hop's
/// expected outputs, each hop split optimally across its pool options.
pub fn quote_route(
    route: &Route,
    states: &PoolStates,
    amount_in: u64,
    slippage: f64,
) -> Option<PlannedSwap> {
    if amount_in == 0 {
        return None;
    }

    let mut hops = Vec::with_capacity(route.hops());
    let mut current = amount_in;
    let mut total_impact = 0.0;

    for i in 0..route.hops() {
        let options = states.usable(&route.pool_options[i]);
        let split =
            optimize_hop_split(&options, route.tokens[i], route.tokens[i + 1], current, slippage)?;
        current = split.total_out();
        if current == 0 {
            return None;
        }
        total_impact += split.price_impact;
        hops.push(split);
    }

    let last = hops.last()?;
    let total_output = last.total_out();
    let total_min_output = last.total_min_out();

    Some(PlannedSwap {
        hops,
        total_input: amount_in,
        total_output,
        total_min_output,
        price_impact: total_impact,
        platform_fee: None,
    })
}
