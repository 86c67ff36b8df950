//! HumbleSwap DEX adapter
//!
//! HumbleSwap pools trade wrapped ARC200 tokens. Deposits shuttle the user's
//! underlying token into its wrapped form before the swap; withdrawals bring
//! the output back out, unless the next hop consumes the wrapped form
//! directly.

pub mod constants;
pub mod fetch;
pub mod state;
pub mod tx_builder;

pub use fetch::fetch_state;
pub use state::{HumbleError, HumblePoolInfo};
pub use tx_builder::{build_swap, HumbleSwapPlan};
