//! HumbleSwap pool state decoding

use thiserror::Error;

use avm_tx::decode_uint256;
use voiswap_core::NodeError;

use crate::constants::layout;

/// HumbleSwap protocol errors
#[derive(Debug, Error)]
pub enum HumbleError {
    #[error("Invalid pool state layout: expected {expected}, found {found}")]
    InvalidLayout {
        expected: &'static str,
        found: String,
    },

    #[error("Pool is locked")]
    PoolLocked,

    #[error("Pool does not trade token {0}")]
    TokenNotInPool(u64),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Transaction build failed: {0}")]
    Build(String),
}

/// Decoded pool state: reserves, the fee tuple, LP supply, and lock flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumblePoolInfo {
    pub reserve_a: u64,
    pub reserve_b: u64,
    /// Protocol fee share, basis points
    pub proto_fee: u64,
    /// LP fee share, basis points
    pub lp_fee: u64,
    /// Total fee, basis points
    pub tot_fee: u64,
    pub lp_supply: u64,
    pub locked: bool,
}

impl HumblePoolInfo {
    /// Decode the packed state blob the pool keeps in global storage:
    /// two uint256 reserves, three uint64 fee fields, a uint256 LP supply,
    /// and a lock byte.
    pub fn decode(blob: &[u8]) -> Result<Self, HumbleError> {
        if blob.len() < layout::BLOB_LEN {
            return Err(HumbleError::InvalidLayout {
                expected: "121-byte state blob",
                found: format!("{} bytes", blob.len()),
            });
        }

        let read_u64 = |offset: usize| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&blob[offset..offset + 8]);
            u64::from_be_bytes(buf)
        };

        Ok(Self {
            reserve_a: decode_uint256(&blob[layout::RESERVE_A..layout::RESERVE_A + 32]),
            reserve_b: decode_uint256(&blob[layout::RESERVE_B..layout::RESERVE_B + 32]),
            proto_fee: read_u64(layout::PROTO_FEE),
            lp_fee: read_u64(layout::LP_FEE),
            tot_fee: read_u64(layout::TOT_FEE),
            lp_supply: decode_uint256(&blob[layout::LP_SUPPLY..layout::LP_SUPPLY + 32]),
            locked: blob[layout::LOCKED] != 0,
        })
    }
}
