//! Swap transaction building
//!
//! A Nomadex swap is a two-transaction sequence: the typed deposit, then the
//! method call that names the deposit as its first ABI argument. The deposit
//! rides in the group rather than the argument list.

use avm_tx::{
    address_arg, app_address, balance_box_refs, method_selector, uint256_arg, BoxRef,
    OnComplete, Transaction, TransactionBody, TransactionHeader,
};
use voiswap_core::{AppId, NomadexPoolConfig, NomadexToken, SwapContext, TokenId, TokenKind};

use crate::constants::{methods, FACTORY_APP_ID, SWAP_CALL_FEE};
use crate::state::NomadexError;

/// Build the deposit + swap-call pair for one Nomadex pool.
pub fn build_swap(
    ctx: &SwapContext,
    cfg: &NomadexPoolConfig,
    pool_id: AppId,
    from: TokenId,
    to: TokenId,
    amount_in: u64,
    min_out: u64,
) -> Result<Vec<Transaction>, NomadexError> {
    let (input, output, signature) = if from == cfg.tok_a.id && to == cfg.tok_b.id {
        (cfg.tok_a, cfg.tok_b, methods::SWAP_A_TO_B)
    } else if from == cfg.tok_b.id && to == cfg.tok_a.id {
        (cfg.tok_b, cfg.tok_a, methods::SWAP_B_TO_A)
    } else {
        return Err(NomadexError::TokenNotInPool(from));
    };

    let pool_pk = app_address(pool_id);

    let deposit = match input.kind {
        TokenKind::Native => Transaction::payment(header(ctx, ctx.params.min_fee), pool_pk, amount_in),
        TokenKind::Asa => Transaction::asset_transfer(
            header(ctx, ctx.params.min_fee),
            input.id,
            pool_pk,
            amount_in,
        ),
        TokenKind::Arc200 => Transaction {
            header: header(ctx, ctx.params.min_fee),
            body: TransactionBody::ApplicationCall {
                app_id: input.id,
                on_complete: OnComplete::NoOp,
                args: vec![
                    method_selector(methods::ARC200_TRANSFER).to_vec(),
                    address_arg(&pool_pk),
                    uint256_arg(amount_in),
                ],
                accounts: vec![],
                foreign_apps: vec![],
                foreign_assets: vec![],
                boxes: balance_box_refs(input.id, &[ctx.sender_pk, pool_pk]),
            },
        },
    };

    // The deposit is the swap method's first (transaction-typed) argument;
    // only the selector and min_out appear in the argument list.
    let mut foreign_apps = vec![FACTORY_APP_ID];
    let mut foreign_assets = Vec::new();
    let mut boxes: Vec<BoxRef> = Vec::new();
    for token in [input, output] {
        match token.kind {
            TokenKind::Arc200 => {
                foreign_apps.push(token.id);
                boxes.extend(balance_box_refs(token.id, &[ctx.sender_pk, pool_pk]));
            }
            TokenKind::Asa => foreign_assets.push(token.id),
            TokenKind::Native => {}
        }
    }

    let swap_call = Transaction {
        header: header(ctx, SWAP_CALL_FEE),
        body: TransactionBody::ApplicationCall {
            app_id: pool_id,
            on_complete: OnComplete::NoOp,
            args: vec![
                method_selector(signature).to_vec(),
                uint256_arg(min_out),
            ],
            accounts: vec![],
            foreign_apps,
            foreign_assets,
            boxes,
        },
    };

    Ok(vec![deposit, swap_call])
}

fn header(ctx: &SwapContext, fee: u64) -> TransactionHeader {
    TransactionHeader::new(
        ctx.sender_pk,
        fee,
        ctx.params.first_valid,
        ctx.params.last_valid,
        ctx.params.genesis_id.clone(),
        ctx.params.genesis_hash,
    )
}
