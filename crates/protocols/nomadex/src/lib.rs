//! Nomadex DEX adapter
//!
//! Nomadex pools take the deposit as the first transaction of a two-part
//! method call: the pool contract inspects that transaction to credit the
//! trade, then the swap call pays out the other side.

pub mod constants;
pub mod fetch;
pub mod state;
pub mod tx_builder;

pub use fetch::{fetch_state, reconcile_reserves};
pub use state::NomadexError;
pub use tx_builder::build_swap;
