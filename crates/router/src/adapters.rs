//! DEX dispatch
//!
//! The two adapters share a capability set (fetch state, build swap); this
//! module is the single place that matches on the pool variant.

use humbleswap::tx_builder::HumbleSwapPlan;
use voiswap_core::{
    AppId, BuildError, ChainGateway, Error, PlanError, PoolConfig, PoolState, PoolVariant,
    SwapContext, TokenId, TokenKind, NATIVE_TOKEN,
};

use avm_tx::Transaction;

/// Fetch the live state of any pool.
pub async fn fetch_pool_state(
    gateway: &dyn ChainGateway,
    pool: &PoolConfig,
) -> Result<PoolState, Error> {
    match &pool.variant {
        PoolVariant::Humbleswap(cfg) => {
            humbleswap::fetch_state(gateway, cfg, pool.pool_id, pool.fee_bps)
                .await
                .map_err(|e| state_error(pool.pool_id, e))
        }
        PoolVariant::Nomadex(cfg) => {
            nomadex::fetch_state(gateway, cfg, pool.pool_id, pool.fee_bps)
                .await
                .map_err(|e| state_error(pool.pool_id, e))
        }
    }
}

fn state_error(pool_id: u64, e: impl std::fmt::Display) -> Error {
    Error::Plan(PlanError::PoolStateUnavailable {
        reason: format!("pool {}: {}", pool_id, e),
    })
}

/// Build the transaction sequence for one pool slice.
#[allow(clippy::too_many_arguments)]
pub async fn build_pool_swap(
    gateway: &dyn ChainGateway,
    ctx: &SwapContext,
    pool: &PoolConfig,
    from: TokenId,
    to: TokenId,
    amount_in: u64,
    min_out: u64,
    skip_deposit: bool,
    skip_withdraw: bool,
    single_hop: bool,
) -> Result<Vec<Transaction>, Error> {
    match &pool.variant {
        PoolVariant::Humbleswap(cfg) => humbleswap::build_swap(
            gateway,
            ctx,
            cfg,
            pool.pool_id,
            from,
            to,
            amount_in,
            min_out,
            HumbleSwapPlan {
                skip_deposit,
                skip_withdraw,
                single_hop,
            },
        )
        .await
        .map_err(|e| build_error(pool.pool_id, e)),
        PoolVariant::Nomadex(cfg) => {
            nomadex::build_swap(ctx, cfg, pool.pool_id, from, to, amount_in, min_out)
                .map_err(|e| build_error(pool.pool_id, e))
        }
    }
}

fn build_error(pool_id: u64, e: impl std::fmt::Display) -> Error {
    Error::Build(BuildError::BuildFailed {
        message: format!("pool {}: {}", pool_id, e),
    })
}

/// How a token is held in this pool's terms.
pub fn token_kind_in_pool(pool: &PoolConfig, token: TokenId) -> TokenKind {
    match &pool.variant {
        PoolVariant::Nomadex(cfg) => {
            if cfg.tok_a.id == token {
                cfg.tok_a.kind
            } else if cfg.tok_b.id == token {
                cfg.tok_b.kind
            } else if token == NATIVE_TOKEN {
                TokenKind::Native
            } else {
                TokenKind::Asa
            }
        }
        PoolVariant::Humbleswap(cfg) => {
            if token == NATIVE_TOKEN {
                TokenKind::Native
            } else if cfg.wrapped_for(token) == Some(token) {
                TokenKind::Arc200
            } else {
                TokenKind::Asa
            }
        }
    }
}

/// The wrapped contract a HumbleSwap pool leaves `token` in when the
/// withdraw step is skipped. `None` for pools with no wrapped shim.
pub fn wrapped_form(pool: &PoolConfig, token: TokenId) -> Option<AppId> {
    match &pool.variant {
        PoolVariant::Humbleswap(cfg) => cfg.wrapped_for(token),
        PoolVariant::Nomadex(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{humble_pool, nomadex_pool};

    #[test]
    fn test_token_kind_nomadex() {
        let pool = nomadex_pool(1, 0, 302222);
        assert_eq!(token_kind_in_pool(&pool, 0), TokenKind::Native);
        assert_eq!(token_kind_in_pool(&pool, 302222), TokenKind::Arc200);
    }

    #[test]
    fn test_token_kind_humble() {
        let pool = humble_pool(2, 0, 77);
        assert_eq!(token_kind_in_pool(&pool, 0), TokenKind::Native);
        // 77 has a wrapped shim, so the underlying is an ASA
        assert_eq!(token_kind_in_pool(&pool, 77), TokenKind::Asa);
    }

    #[test]
    fn test_wrapped_form() {
        let humble = humble_pool(2, 0, 77);
        assert_eq!(wrapped_form(&humble, 0), Some(1_000_000));
        assert_eq!(wrapped_form(&humble, 77), Some(1_000_077));
        let nomadex = nomadex_pool(1, 0, 77);
        assert_eq!(wrapped_form(&nomadex, 0), None);
    }
}
