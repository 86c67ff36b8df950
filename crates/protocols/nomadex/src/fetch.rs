//! Pool state fetching and reserve reconciliation
//!
//! Nomadex contracts of different vintages store reserves under different
//! keys, and some store them in the opposite order from the catalog
//! declaration. State values are therefore cross-checked against the pool
//! account's observable balances before they are trusted.

use std::collections::HashMap;

use avm_tx::{app_address, encode_address};
use voiswap_core::{
    AppId, ChainGateway, NodeError, NomadexPoolConfig, NomadexToken, PoolState, TealValue,
    TokenKind,
};

use crate::constants::{state_keys, DEFAULT_FEE_BPS};
use crate::state::NomadexError;

/// Read the first matching key alias as a uint.
fn read_first(state: &HashMap<String, TealValue>, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|k| state.get(*k).and_then(TealValue::as_uint))
}

/// Observe one side's actual balance in the pool account. `Some(0)` means
/// observably empty; `None` means the balance could not be read at all.
async fn observe_side(
    gateway: &dyn ChainGateway,
    token: NomadexToken,
    pool_address: &str,
) -> Option<u64> {
    match token.kind {
        TokenKind::Native => gateway
            .account_state(pool_address)
            .await
            .ok()
            .map(|a| a.balance),
        TokenKind::Asa => gateway
            .account_state(pool_address)
            .await
            .ok()
            .map(|a| a.assets.get(&token.id).copied().unwrap_or(0)),
        TokenKind::Arc200 => match gateway.arc200_balance(token.id, pool_address).await {
            Ok(v) => Some(v),
            Err(NodeError::BoxNotFound { .. }) => Some(0),
            Err(_) => None,
        },
    }
}

/// Harmonize state-declared reserves with observed balances.
///
/// Precedence:
/// 1. state matches observations in order: accept
/// 2. state matches observations swapped: swap
/// 3. both sides observed but neither matches: trust observations
/// 4. one side observed: swap if it lines up with the other slot,
///    otherwise overwrite its own slot
/// 5. nothing observed: trust state
pub fn reconcile_reserves(
    reserve_a: u64,
    reserve_b: u64,
    actual_a: Option<u64>,
    actual_b: Option<u64>,
) -> (u64, u64) {
    match (actual_a, actual_b) {
        (Some(aa), Some(ab)) => {
            if (reserve_a, reserve_b) == (aa, ab) {
                (reserve_a, reserve_b)
            } else if (reserve_a, reserve_b) == (ab, aa) {
                (reserve_b, reserve_a)
            } else {
                (aa, ab)
            }
        }
        (Some(aa), None) => {
            if reserve_b == aa && reserve_a != aa {
                (reserve_b, reserve_a)
            } else {
                (aa, reserve_b)
            }
        }
        (None, Some(ab)) => {
            if reserve_a == ab && reserve_b != ab {
                (reserve_b, reserve_a)
            } else {
                (reserve_a, ab)
            }
        }
        (None, None) => (reserve_a, reserve_b),
    }
}

/// Fetch the live state of a Nomadex pool, reconciled so that `reserve_a`
/// belongs to the catalog's `tok_a`.
pub async fn fetch_state(
    gateway: &dyn ChainGateway,
    cfg: &NomadexPoolConfig,
    pool_id: AppId,
    fee_override: Option<u32>,
) -> Result<PoolState, NomadexError> {
    let global = gateway.application_global_state(pool_id).await?;

    let reserve_a =
        read_first(&global, state_keys::RESERVE_A).ok_or(NomadexError::StateUnavailable {
            reason: format!("pool {} exposes no reserve A key", pool_id),
        })?;
    let reserve_b =
        read_first(&global, state_keys::RESERVE_B).ok_or(NomadexError::StateUnavailable {
            reason: format!("pool {} exposes no reserve B key", pool_id),
        })?;

    let fee_bps = fee_override
        .or_else(|| read_first(&global, state_keys::FEE).map(|f| f as u32))
        .unwrap_or(DEFAULT_FEE_BPS);

    let pool_address = encode_address(&app_address(pool_id));
    let actual_a = observe_side(gateway, cfg.tok_a, &pool_address).await;
    let actual_b = observe_side(gateway, cfg.tok_b, &pool_address).await;

    let (declared_a, declared_b) = (reserve_a, reserve_b);
    let (reserve_a, reserve_b) = reconcile_reserves(reserve_a, reserve_b, actual_a, actual_b);
    if (reserve_a, reserve_b) != (declared_a, declared_b) {
        tracing::debug!(
            pool_id,
            declared_a,
            declared_b,
            reserve_a,
            reserve_b,
            "reconciled pool reserves against observed balances"
        );
    }

    Ok(PoolState {
        reserve_a,
        reserve_b,
        fee_bps,
        tok_a: cfg.tok_a.id,
        tok_b: cfg.tok_b.id,
    })
}
