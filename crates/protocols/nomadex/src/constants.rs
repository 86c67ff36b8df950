//! Nomadex protocol constants

/// Factory application, referenced by every pool call
pub const FACTORY_APP_ID: u64 = 411_756;

/// Fee assumed when neither the catalog nor the chain state carries one,
/// basis points
pub const DEFAULT_FEE_BPS: u32 = 30;

/// Flat fee allowance on the swap call, covering the payout inner
/// transactions, in microunits
pub const SWAP_CALL_FEE: u64 = 4_000;

/// Key aliases for loosely-typed global state. Contracts of different
/// vintages store the same field under different names; readers take the
/// first key that matches.
pub mod state_keys {
    pub const RESERVE_A: &[&str] = &["reserve_a", "reserveA", "r_a", "ra", "reserve0", "reserve_0"];
    pub const RESERVE_B: &[&str] = &["reserve_b", "reserveB", "r_b", "rb", "reserve1", "reserve_1"];
    pub const FEE: &[&str] = &["fee", "tot_fee", "total_fee", "fee_bps"];
}

/// Method signatures
pub mod methods {
    /// Pool entry points; the deposit transaction is the first ABI argument
    pub const SWAP_A_TO_B: &str = "swapAtoB(txn,uint256)uint256";
    pub const SWAP_B_TO_A: &str = "swapBtoA(txn,uint256)uint256";

    pub const ARC200_TRANSFER: &str = "arc200_transfer(address,uint256)bool";
}
