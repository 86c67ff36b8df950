//! HumbleSwap protocol constants

/// Flat fee allowance on the swap application call, in microunits. Covers
/// the inner transactions the pool contract issues.
pub const SWAP_FEE_ALLOWANCE: u64 = 5_000;

/// Resource beacon application. No-op calls against it pad short groups so
/// the pool call has enough reference slots.
pub const BEACON_APP_ID: u64 = 290_956;

/// Minimum group size for a single-hop plan; shorter groups are padded with
/// beacon no-ops.
pub const MIN_GROUP_TXNS: usize = 2;

/// Global-state key holding the packed pool state blob
pub const POOL_STATE_KEY: &str = "v";

/// Global-state key a wrapped contract sets when it supports auto-redeem
pub const EXCHANGE_CAPABILITY_KEY: &str = "exchange";

/// Method signatures
pub mod methods {
    /// Pool entry points, one per direction
    pub const SWAP_A_FOR_B: &str = "Trader_swapAForB(uint64,uint256,uint256)(uint256,uint256)";
    pub const SWAP_B_FOR_A: &str = "Trader_swapBForA(uint64,uint256,uint256)(uint256,uint256)";

    /// Wrapped-token contract methods
    pub const CREATE_BALANCE_BOX: &str = "createBalanceBox(pay)void";
    pub const DEPOSIT_NATIVE: &str = "deposit(pay)uint256";
    pub const DEPOSIT_ASA: &str = "deposit(axfer)uint256";
    pub const REDEEM_ASA: &str = "redeem(axfer)uint256";
    pub const WITHDRAW: &str = "withdraw(uint256)uint256";

    /// ARC200 surface shared by all wrapped contracts
    pub const ARC200_APPROVE: &str = "arc200_approve(address,uint256)bool";
    pub const ARC200_TRANSFER: &str = "arc200_transfer(address,uint256)bool";

    /// Beacon no-op
    pub const BEACON_NOP: &str = "nop()void";
}

/// Byte offsets into the packed pool state blob
pub mod layout {
    pub const RESERVE_A: usize = 0;
    pub const RESERVE_B: usize = 32;
    pub const PROTO_FEE: usize = 64;
    pub const LP_FEE: usize = 72;
    pub const TOT_FEE: usize = 80;
    pub const LP_SUPPLY: usize = 88;
    pub const LOCKED: usize = 120;
    pub const BLOB_LEN: usize = 121;
}
