//! Route discovery
//!
//! Breadth-first enumeration of simple paths, then enrichment: for each
//! distinct token sequence, every pool in the graph covering each hop becomes
//! an option, not just the pool the search happened to walk.

use std::collections::{HashSet, VecDeque};

use voiswap_core::TokenId;

use crate::graph::PoolGraph;
use crate::state::Route;

/// Find all simple paths from `src` to `dst` with 1..=max_hops hops,
/// sorted ascending by hop count.
pub fn find_routes(
    graph: &PoolGraph,
    src: TokenId,
    dst: TokenId,
    max_hops: usize,
) -> Vec<Route> {
    if src == dst || max_hops == 0 {
        return Vec::new();
    }

    // BFS over token sequences; a token may not repeat within a path
    let mut sequences: Vec<Vec<TokenId>> = Vec::new();
    let mut seen_sequences: HashSet<Vec<TokenId>> = HashSet::new();

    let mut queue: VecDeque<Vec<TokenId>> = VecDeque::new();
    queue.push_back(vec![src]);

    while let Some(path) = queue.pop_front() {
        let current = *path.last().expect("path is never empty");
        if path.len() > max_hops {
            continue;
        }

        for edge in graph.neighbors(current) {
            if edge.other == dst {
                let mut complete = path.clone();
                complete.push(dst);
                if seen_sequences.insert(complete.clone()) {
                    sequences.push(complete);
                }
            } else if path.len() < max_hops && !path.contains(&edge.other) {
                let mut extended = path.clone();
                extended.push(edge.other);
                queue.push_back(extended);
            }
        }
    }

    // Enrich each sequence with every covering pool per hop
    let mut routes: Vec<Route> = sequences
        .into_iter()
        .filter_map(|tokens| {
            let pool_options: Vec<_> = tokens
                .windows(2)
                .map(|pair| graph.pools_covering(pair[0], pair[1]))
                .collect();
            // A hop with no pools cannot happen for BFS-found paths, but
            // guard anyway
            if pool_options.iter().any(Vec::is_empty) {
                return None;
            }
            Some(Route {
                tokens,
                pool_options,
            })
        })
        .collect();

    routes.sort_by_key(Route::hops);
    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_pool_graph, tests::humble_pool, tests::nomadex_pool};

    #[test]
    fn test_direct_route() {
        let graph = build_pool_graph(&[nomadex_pool(1, 0, 10)], None);
        let routes = find_routes(&graph, 0, 10, 2);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].tokens, vec![0, 10]);
        assert_eq!(routes[0].hops(), 1);
        assert_eq!(routes[0].pool_options[0].len(), 1);
    }

    #[test]
    fn test_two_hop_route() {
        let pools = [nomadex_pool(1, 0, 10), nomadex_pool(2, 10, 20)];
        let graph = build_pool_graph(&pools, None);
        let routes = find_routes(&graph, 0, 20, 2);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].tokens, vec![0, 10, 20]);
        assert_eq!(routes[0].hops(), 2);
    }

    #[test]
    fn test_options_cover_all_pools_not_just_walked() {
        // Two pools on the first hop, one on the second. BFS walks one of
        // the parallel pools; enrichment must list both.
        let pools = [
            nomadex_pool(1, 0, 10),
            humble_pool(2, 0, 10),
            nomadex_pool(3, 10, 20),
        ];
        let graph = build_pool_graph(&pools, None);
        let routes = find_routes(&graph, 0, 20, 2);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].pool_options[0].len(), 2);
        assert_eq!(routes[0].pool_options[1].len(), 1);
    }

    #[test]
    fn test_direct_sorted_before_multihop() {
        let pools = [
            nomadex_pool(1, 0, 20),
            nomadex_pool(2, 0, 10),
            nomadex_pool(3, 10, 20),
        ];
        let graph = build_pool_graph(&pools, None);
        let routes = find_routes(&graph, 0, 20, 2);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].hops(), 1);
        assert_eq!(routes[1].hops(), 2);
    }

    #[test]
    fn test_no_token_revisited() {
        // 0-10, 10-20, 20-0 triangle; paths 0->20 must not loop through 0
        let pools = [
            nomadex_pool(1, 0, 10),
            nomadex_pool(2, 10, 20),
            nomadex_pool(3, 20, 0),
        ];
        let graph = build_pool_graph(&pools, None);
        let routes = find_routes(&graph, 0, 20, 2);
        for route in &routes {
            let unique: HashSet<_> = route.tokens.iter().collect();
            assert_eq!(unique.len(), route.tokens.len());
        }
    }

    #[test]
    fn test_hop_limit_respected() {
        let pools = [
            nomadex_pool(1, 0, 10),
            nomadex_pool(2, 10, 20),
            nomadex_pool(3, 20, 30),
        ];
        let graph = build_pool_graph(&pools, None);
        assert!(find_routes(&graph, 0, 30, 2).is_empty());
        assert_eq!(find_routes(&graph, 0, 30, 3).len(), 1);
    }

    #[test]
    fn test_same_source_and_target_is_empty() {
        let graph = build_pool_graph(&[nomadex_pool(1, 0, 10)], None);
        assert!(find_routes(&graph, 10, 10, 2).is_empty());
    }

    #[test]
    fn test_unreachable_target_is_empty() {
        let graph = build_pool_graph(&[nomadex_pool(1, 0, 10)], None);
        assert!(find_routes(&graph, 0, 999, 2).is_empty());
    }
}
