//! Smart router: route discovery, split optimization, and atomic group
//! assembly across HumbleSwap and Nomadex pools.

pub mod adapters;
pub mod calculator;
pub mod graph;
pub mod group_builder;
pub mod planner;
pub mod quote;
pub mod selector;
pub mod state;

pub use adapters::{fetch_pool_state, token_kind_in_pool};
pub use calculator::{compute_output, min_out_with_slippage, price_impact, spot_price};
pub use graph::{build_pool_graph, PoolEdge, PoolGraph};
pub use group_builder::{build_swap_group, BuiltGroup};
pub use planner::find_routes;
pub use quote::{optimize_hop_split, prefetch_pool_states, quote_pool, quote_route, PoolStates};
pub use selector::{plan_best_swap, RouteKind, RoutePlan};
pub use state::{HopSplit, PlannedSwap, PlatformFee, PoolQuote, PoolSlice, Route};
