//! Pool graph
//!
//! An undirected multigraph over underlying token ids. Each pool contributes
//! one edge between the two tokens it trades; parallel edges (several pools
//! on the same pair) are kept, since the splitter wants all of them.

use std::collections::{HashMap, HashSet};

use voiswap_core::{Dex, PoolConfig, TokenId};

/// One traversal option out of a token
#[derive(Debug, Clone)]
pub struct PoolEdge {
    pub pool: PoolConfig,
    pub other: TokenId,
}

/// Adjacency-list pool graph
#[derive(Debug, Clone, Default)]
pub struct PoolGraph {
    adjacency: HashMap<TokenId, Vec<PoolEdge>>,
    pub pool_count: usize,
}

/// Build the graph from the catalog, optionally restricted to one DEX.
pub fn build_pool_graph(pools: &[PoolConfig], dex_filter: Option<Dex>) -> PoolGraph {
    let mut graph = PoolGraph::default();

    for pool in pools {
        if let Some(dex) = dex_filter {
            if pool.dex() != dex {
                continue;
            }
        }

        let (a, b) = pool.underlying_pair();
        if a == b {
            continue;
        }

        graph.adjacency.entry(a).or_default().push(PoolEdge {
            pool: pool.clone(),
            other: b,
        });
        graph.adjacency.entry(b).or_default().push(PoolEdge {
            pool: pool.clone(),
            other: a,
        });
        graph.pool_count += 1;
    }

    graph
}

impl PoolGraph {
    pub fn neighbors(&self, token: TokenId) -> &[PoolEdge] {
        self.adjacency
            .get(&token)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every pool covering the (unordered) pair, deduplicated by pool id.
    pub fn pools_covering(&self, a: TokenId, b: TokenId) -> Vec<PoolConfig> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for edge in self.neighbors(a) {
            if edge.other == b && seen.insert(edge.pool.pool_id) {
                out.push(edge.pool.clone());
            }
        }
        out
    }

    pub fn contains(&self, token: TokenId) -> bool {
        self.adjacency.contains_key(&token)
    }
}
