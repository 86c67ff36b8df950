//! Pool state fetching

use voiswap_core::{AppId, ChainGateway, HumblePoolConfig, PoolState, TealValue};

use crate::constants::POOL_STATE_KEY;
use crate::state::{HumbleError, HumblePoolInfo};

/// Fetch and decode the live state of a HumbleSwap pool.
///
/// Reserve A always belongs to the pool's `tok_a` wrapped contract; the
/// contract maintains that ordering itself, so no reconciliation is needed
/// here. `fee_override` (basis points) takes precedence over the on-chain
/// fee when the catalog pins one.
pub async fn fetch_state(
    gateway: &dyn ChainGateway,
    cfg: &HumblePoolConfig,
    pool_id: AppId,
    fee_override: Option<u32>,
) -> Result<PoolState, HumbleError> {
    let global = gateway.application_global_state(pool_id).await?;

    let blob = match global.get(POOL_STATE_KEY) {
        Some(TealValue::Bytes(b)) => b.as_slice(),
        Some(TealValue::Uint(_)) => {
            return Err(HumbleError::InvalidLayout {
                expected: "bytes state blob",
                found: "uint".to_string(),
            })
        }
        None => {
            return Err(HumbleError::InvalidLayout {
                expected: "state blob under key \"v\"",
                found: "missing".to_string(),
            })
        }
    };

    let info = HumblePoolInfo::decode(blob)?;
    if info.locked {
        return Err(HumbleError::PoolLocked);
    }

    Ok(PoolState {
        reserve_a: info.reserve_a,
        reserve_b: info.reserve_b,
        fee_bps: fee_override.unwrap_or(info.tot_fee as u32),
        tok_a: cfg.underlying_for(cfg.tok_a),
        tok_b: cfg.underlying_for(cfg.tok_b),
    })
}
