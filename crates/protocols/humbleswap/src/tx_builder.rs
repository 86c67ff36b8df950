//! Swap transaction sequencing
//!
//! One HumbleSwap hop assembles, in order: deposit of the underlying input
//! into its wrapped form, approval of the pool over the input, ensurement of
//! the output balance boxes, beacon padding for short single-hop groups, the
//! swap call itself, and the withdrawal of the output. Group ids are NOT
//! assigned here; the group builder stamps the whole sequence at once.

use avm_tx::{
    address_arg, app_address, balance_box_refs, encode_address, method_selector, uint256_arg,
    uint256_max_arg, uint64_arg, BoxName, BoxRef, OnComplete, Transaction, TransactionBody,
    TransactionHeader,
};
use voiswap_core::constants::BALANCE_BOX_COST;
use voiswap_core::{
    AppId, ChainGateway, HumblePoolConfig, NodeError, SwapContext, TealValue, TokenId,
    NATIVE_TOKEN,
};

use crate::constants::{
    methods, BEACON_APP_ID, EXCHANGE_CAPABILITY_KEY, MIN_GROUP_TXNS, SWAP_FEE_ALLOWANCE,
};
use crate::state::HumbleError;

/// How this hop sits inside the overall plan
#[derive(Debug, Clone, Copy)]
pub struct HumbleSwapPlan {
    /// Previous hop already left the input in wrapped form
    pub skip_deposit: bool,
    /// Next hop consumes the wrapped output directly
    pub skip_withdraw: bool,
    /// The whole plan is this one hop (enables beacon padding)
    pub single_hop: bool,
}

impl Default for HumbleSwapPlan {
    fn default() -> Self {
        Self {
            skip_deposit: false,
            skip_withdraw: false,
            single_hop: true,
        }
    }
}

/// Build the transaction sequence for one swap on a HumbleSwap pool.
#[allow(clippy::too_many_arguments)]
pub async fn build_swap(
    gateway: &dyn ChainGateway,
    ctx: &SwapContext,
    cfg: &HumblePoolConfig,
    pool_id: AppId,
    from: TokenId,
    to: TokenId,
    amount_in: u64,
    min_out: u64,
    plan: HumbleSwapPlan,
) -> Result<Vec<Transaction>, HumbleError> {
    let wrapped_in = cfg
        .wrapped_for(from)
        .ok_or(HumbleError::TokenNotInPool(from))?;
    let wrapped_out = cfg
        .wrapped_for(to)
        .ok_or(HumbleError::TokenNotInPool(to))?;

    let pool_pk = app_address(pool_id);
    let pool_address = encode_address(&pool_pk);

    let mut txns: Vec<Transaction> = Vec::new();

    // 1. Deposit the underlying into its wrapped form
    if wrapped_in != from && !plan.skip_deposit {
        build_deposit(gateway, ctx, from, wrapped_in, amount_in, &mut txns).await?;
    }

    // 2. Approve the pool over the input wrapped token
    build_approval(
        gateway,
        ctx,
        wrapped_in,
        &pool_pk,
        &pool_address,
        amount_in,
        &mut txns,
    )
    .await?;

    // 3. Ensure output balance boxes exist
    match gateway.arc200_balance(wrapped_out, &pool_address).await {
        Ok(_) => {}
        Err(NodeError::BoxNotFound { .. }) => {
            txns.push(payment(ctx, app_address(wrapped_out), BALANCE_BOX_COST));
            txns.push(zero_transfer(ctx, wrapped_out, &pool_pk));
        }
        Err(e) => return Err(e.into()),
    }
    if wrapped_out == to {
        // Pure ARC200 output lands in the user's own balance box
        match gateway.arc200_balance(wrapped_out, ctx.sender.as_str()).await {
            Ok(_) => {}
            Err(NodeError::BoxNotFound { .. }) => {
                txns.push(payment(ctx, app_address(wrapped_out), BALANCE_BOX_COST));
                txns.push(zero_transfer(ctx, wrapped_out, &ctx.sender_pk));
            }
            Err(e) => return Err(e.into()),
        }
    }

    // 4. Pad short single-hop groups with beacon no-ops so the swap call has
    //    enough reference slots
    if plan.single_hop {
        while txns.len() < MIN_GROUP_TXNS {
            tracing::debug!(pool_id, "padding group with beacon no-op");
            txns.push(beacon_nop(ctx));
        }
    }

    // 5. The swap itself
    let signature = if wrapped_in == cfg.tok_a {
        methods::SWAP_A_FOR_B
    } else {
        methods::SWAP_B_FOR_A
    };
    let mut swap_boxes = balance_box_refs(wrapped_in, &[ctx.sender_pk, pool_pk]);
    swap_boxes.extend(balance_box_refs(wrapped_out, &[ctx.sender_pk, pool_pk]));
    txns.push(Transaction {
        header: header(ctx, SWAP_FEE_ALLOWANCE),
        body: TransactionBody::ApplicationCall {
            app_id: pool_id,
            on_complete: OnComplete::NoOp,
            args: vec![
                method_selector(signature).to_vec(),
                uint64_arg(0),
                uint256_arg(amount_in),
                uint256_arg(min_out),
            ],
            accounts: vec![],
            foreign_apps: vec![cfg.tok_a, cfg.tok_b, BEACON_APP_ID],
            foreign_assets: vec![],
            boxes: swap_boxes,
        },
    });

    // 6. Withdraw the output back to its underlying form
    let withdraw_needed = wrapped_out != to
        && !plan.skip_withdraw
        && !has_exchange(gateway, wrapped_out).await?;
    if withdraw_needed {
        txns.push(Transaction {
            header: header(ctx, ctx.params.min_fee),
            body: TransactionBody::ApplicationCall {
                app_id: wrapped_out,
                on_complete: OnComplete::NoOp,
                args: vec![
                    method_selector(methods::WITHDRAW).to_vec(),
                    uint256_arg(min_out),
                ],
                accounts: vec![],
                foreign_apps: vec![],
                foreign_assets: vec![],
                boxes: balance_box_refs(wrapped_out, &[ctx.sender_pk]),
            },
        });
    }

    Ok(txns)
}

async fn build_deposit(
    gateway: &dyn ChainGateway,
    ctx: &SwapContext,
    from: TokenId,
    wrapped_in: AppId,
    amount_in: u64,
    txns: &mut Vec<Transaction>,
) -> Result<(), HumbleError> {
    let wrapped_addr = app_address(wrapped_in);
    let has_box = match gateway.arc200_balance(wrapped_in, ctx.sender.as_str()).await {
        Ok(_) => true,
        Err(NodeError::BoxNotFound { .. }) => false,
        Err(e) => return Err(e.into()),
    };

    if from == NATIVE_TOKEN {
        if !has_box {
            txns.push(payment(ctx, wrapped_addr, BALANCE_BOX_COST));
            txns.push(simple_call(
                ctx,
                wrapped_in,
                methods::CREATE_BALANCE_BOX,
                balance_box_refs(wrapped_in, &[ctx.sender_pk]),
            ));
        }
        txns.push(payment(ctx, wrapped_addr, amount_in));
        txns.push(simple_call(
            ctx,
            wrapped_in,
            methods::DEPOSIT_NATIVE,
            balance_box_refs(wrapped_in, &[ctx.sender_pk]),
        ));
    } else if has_exchange(gateway, wrapped_in).await? {
        // Redeem shim: converts the user's full ASA holding in one go
        let account = gateway.account_state(ctx.sender.as_str()).await?;
        let full_balance = account.assets.get(&from).copied().unwrap_or(amount_in);
        txns.push(Transaction::asset_transfer(
            header(ctx, ctx.params.min_fee),
            from,
            wrapped_addr,
            full_balance,
        ));
        txns.push(simple_call(
            ctx,
            wrapped_in,
            methods::REDEEM_ASA,
            balance_box_refs(wrapped_in, &[ctx.sender_pk]),
        ));
    } else {
        if !has_box {
            txns.push(payment(ctx, wrapped_addr, BALANCE_BOX_COST));
        }
        txns.push(Transaction::asset_transfer(
            header(ctx, ctx.params.min_fee),
            from,
            wrapped_addr,
            amount_in,
        ));
        txns.push(simple_call(
            ctx,
            wrapped_in,
            methods::DEPOSIT_ASA,
            balance_box_refs(wrapped_in, &[ctx.sender_pk]),
        ));
    }

    Ok(())
}

async fn build_approval(
    gateway: &dyn ChainGateway,
    ctx: &SwapContext,
    wrapped_in: AppId,
    pool_pk: &[u8; 32],
    pool_address: &str,
    amount_in: u64,
    txns: &mut Vec<Transaction>,
) -> Result<(), HumbleError> {
    let (allowance, has_approval_box) = match gateway
        .arc200_allowance(wrapped_in, ctx.sender.as_str(), pool_address)
        .await
    {
        Ok(v) => (v, true),
        Err(NodeError::BoxNotFound { .. }) => (0, false),
        Err(e) => return Err(e.into()),
    };

    if !has_approval_box {
        txns.push(payment(ctx, app_address(wrapped_in), BALANCE_BOX_COST));
    }

    let amount_arg = if ctx.degen && allowance >= amount_in {
        uint256_max_arg()
    } else {
        uint256_arg(amount_in)
    };

    let mut boxes = balance_box_refs(wrapped_in, &[ctx.sender_pk, *pool_pk]);
    boxes.push(BoxRef {
        app: wrapped_in,
        name: BoxName::approvals(&ctx.sender_pk, pool_pk),
    });

    txns.push(Transaction {
        header: header(ctx, ctx.params.min_fee),
        body: TransactionBody::ApplicationCall {
            app_id: wrapped_in,
            on_complete: OnComplete::NoOp,
            args: vec![
                method_selector(methods::ARC200_APPROVE).to_vec(),
                address_arg(pool_pk),
                amount_arg,
            ],
            accounts: vec![],
            foreign_apps: vec![],
            foreign_assets: vec![],
            boxes,
        },
    });

    Ok(())
}

async fn has_exchange(
    gateway: &dyn ChainGateway,
    app_id: AppId,
) -> Result<bool, HumbleError> {
    let state = gateway.application_global_state(app_id).await?;
    Ok(matches!(
        state.get(EXCHANGE_CAPABILITY_KEY),
        Some(TealValue::Uint(1))
    ))
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

fn payment(ctx: &SwapContext, receiver: [u8; 32], amount: u64) -> Transaction {
    Transaction::payment(header(ctx, ctx.params.min_fee), receiver, amount)
}

fn simple_call(
    ctx: &SwapContext,
    app_id: AppId,
    signature: &str,
    boxes: Vec<BoxRef>,
) -> Transaction {
    Transaction {
        header: header(ctx, ctx.params.min_fee),
        body: TransactionBody::ApplicationCall {
            app_id,
            on_complete: OnComplete::NoOp,
            args: vec![method_selector(signature).to_vec()],
            accounts: vec![],
            foreign_apps: vec![],
            foreign_assets: vec![],
            boxes,
        },
    }
}

fn beacon_nop(ctx: &SwapContext) -> Transaction {
    Transaction {
        header: header(ctx, ctx.params.min_fee),
        body: TransactionBody::ApplicationCall {
            app_id: BEACON_APP_ID,
            on_complete: OnComplete::NoOp,
            args: vec![method_selector(methods::BEACON_NOP).to_vec()],
            accounts: vec![],
            foreign_apps: vec![],
            foreign_assets: vec![],
            boxes: vec![],
        },
    }
}

/// Zero-value ARC200 transfer, used purely to materialize the receiver's
/// balance box.
fn zero_transfer(ctx: &SwapContext, app_id: AppId, receiver_pk: &[u8; 32]) -> Transaction {
    Transaction {
        header: header(ctx, ctx.params.min_fee),
        body: TransactionBody::ApplicationCall {
            app_id,
            on_complete: OnComplete::NoOp,
            args: vec![
                method_selector(methods::ARC200_TRANSFER).to_vec(),
                address_arg(receiver_pk),
                uint256_arg(0),
            ],
            accounts: vec![],
            foreign_apps: vec![],
            foreign_assets: vec![],
            boxes: balance_box_refs(app_id, &[ctx.sender_pk, *receiver_pk]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use voiswap_core::{AccountState, Address, SuggestedParams};

    /// Stub chain with configurable balance boxes and allowances
    struct StubGateway {
        /// (app, address) pairs that have a balance box
        balance_boxes: HashSet<(u64, String)>,
        /// (app, owner, spender) -> allowance
        allowances: HashMap<(u64, String, String), u64>,
        /// wrapped apps advertising auto-redeem
        exchange_apps: HashSet<u64>,
        asa_balance: u64,
    }

    impl StubGateway {
        fn empty() -> Self {
            Self {
                balance_boxes: HashSet::new(),
                allowances: HashMap::new(),
                exchange_apps: HashSet::new(),
                asa_balance: 0,
            }
        }
    }

    #[async_trait]
    impl ChainGateway for StubGateway {
        async fn account_state(&self, _address: &str) -> Result<AccountState, NodeError> {
            Ok(AccountState {
                balance: 1_000_000_000,
                assets: HashMap::from([(6779767, self.asa_balance)]),
            })
        }

        async fn application_global_state(
            &self,
            app_id: u64,
        ) -> Result<HashMap<String, TealValue>, NodeError> {
            let mut state = HashMap::new();
            if self.exchange_apps.contains(&app_id) {
                state.insert(EXCHANGE_CAPABILITY_KEY.to_string(), TealValue::Uint(1));
            }
            Ok(state)
        }

        async fn asset_decimals(&self, _asset_id: u64) -> Result<u32, NodeError> {
            Ok(6)
        }

        async fn arc200_balance(&self, app_id: u64, address: &str) -> Result<u64, NodeError> {
            if self.balance_boxes.contains(&(app_id, address.to_string())) {
                Ok(100)
            } else {
                Err(NodeError::BoxNotFound {
                    app_id,
                    name: String::new(),
                })
            }
        }

        async fn arc200_allowance(
            &self,
            app_id: u64,
            owner: &str,
            spender: &str,
        ) -> Result<u64, NodeError> {
            self.allowances
                .get(&(app_id, owner.to_string(), spender.to_string()))
                .copied()
                .ok_or(NodeError::BoxNotFound {
                    app_id,
                    name: String::new(),
                })
        }

        async fn suggested_params(&self) -> Result<SuggestedParams, NodeError> {
            Ok(params())
        }
    }

    fn params() -> SuggestedParams {
        SuggestedParams {
            fee: 0,
            min_fee: 1000,
            first_valid: 100,
            last_valid: 1100,
            genesis_id: "voi-test".into(),
            genesis_hash: [3; 32],
        }
    }

    fn ctx() -> SwapContext {
        let pk = [7u8; 32];
        SwapContext {
            sender: Address::new(encode_address(&pk)),
            sender_pk: pk,
            params: params(),
            degen: false,
        }
    }

    fn cfg() -> HumblePoolConfig {
        HumblePoolConfig {
            tok_a: 302189,
            tok_b: 302190,
            underlying_to_wrapped: HashMap::from([(0, 302189), (6779767, 302190)]),
            unwrap: [302189, 302190].into_iter().collect(),
        }
    }

    const POOL: u64 = 395553;

    fn app_ids(txns: &[Transaction]) -> Vec<u64> {
        txns.iter()
            .filter_map(|t| match &t.body {
                TransactionBody::ApplicationCall { app_id, .. } => Some(*app_id),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_native_swap_sequence() {
        let gateway = StubGateway::empty();
        let txns = build_swap(
            &gateway,
            &ctx(),
            &cfg(),
            POOL,
            0,
            6779767,
            10_000,
            9_772,
            HumbleSwapPlan::default(),
        )
        .await
        .unwrap();

        // Fresh user: box create pair, deposit pair, approval box payment +
        // approve, output box payment + zero transfer, swap, withdraw
        assert!(txns.len() >= 6);
        let calls = app_ids(&txns);
        // Swap call present, addressed to the pool
        assert!(calls.contains(&POOL));
        // Withdraw to the wrapped output comes after the swap
        let swap_pos = calls.iter().position(|&a| a == POOL).unwrap();
        assert_eq!(calls.last(), Some(&302190));
        assert!(swap_pos < calls.len() - 1);
        // Nothing is grouped yet
        assert!(txns.iter().all(|t| t.header.group.is_none()));
    }

    #[tokio::test]
    async fn test_swap_call_fee_allowance() {
        let gateway = StubGateway::empty();
        let txns = build_swap(
            &gateway,
            &ctx(),
            &cfg(),
            POOL,
            0,
            6779767,
            10_000,
            9_772,
            HumbleSwapPlan::default(),
        )
        .await
        .unwrap();

        let swap = txns
            .iter()
            .find(|t| matches!(&t.body, TransactionBody::ApplicationCall { app_id, .. } if *app_id == POOL))
            .unwrap();
        assert_eq!(swap.header.fee, SWAP_FEE_ALLOWANCE);
        // Foreign apps carry both wrapped contracts and the beacon
        let TransactionBody::ApplicationCall { foreign_apps, .. } = &swap.body else {
            unreachable!();
        };
        assert_eq!(foreign_apps, &vec![302189, 302190, BEACON_APP_ID]);
    }

    #[tokio::test]
    async fn test_skip_withdraw_for_chaining() {
        let gateway = StubGateway::empty();
        let txns = build_swap(
            &gateway,
            &ctx(),
            &cfg(),
            POOL,
            0,
            6779767,
            10_000,
            9_772,
            HumbleSwapPlan {
                skip_deposit: false,
                skip_withdraw: true,
                single_hop: false,
            },
        )
        .await
        .unwrap();

        // No withdraw call against the output wrapped contract at the tail
        let calls = app_ids(&txns);
        assert_eq!(calls.last(), Some(&POOL));
    }

    #[tokio::test]
    async fn test_skip_deposit_for_chaining() {
        let mut gateway = StubGateway::empty();
        // Mid-route the user already holds wrapped input
        gateway
            .balance_boxes
            .insert((302189, ctx().sender.as_str().to_string()));
        let txns = build_swap(
            &gateway,
            &ctx(),
            &cfg(),
            POOL,
            0,
            6779767,
            10_000,
            9_772,
            HumbleSwapPlan {
                skip_deposit: true,
                skip_withdraw: false,
                single_hop: false,
            },
        )
        .await
        .unwrap();

        // No deposit payment of the swap amount into the wrapped input
        // contract (the only remaining payment is the approval box cost)
        let wrapped_in_addr = app_address(302189);
        assert!(!txns.iter().any(|t| matches!(
            &t.body,
            TransactionBody::Payment { receiver, amount } if *receiver == wrapped_in_addr && *amount == 10_000
        )));
    }

    #[tokio::test]
    async fn test_degen_approval_uses_max() {
        let mut gateway = StubGateway::empty();
        let user = ctx();
        let pool_address = encode_address(&app_address(POOL));
        gateway.allowances.insert(
            (302189, user.sender.as_str().to_string(), pool_address),
            50_000,
        );

        let mut degen_ctx = user.clone();
        degen_ctx.degen = true;

        let txns = build_swap(
            &gateway,
            &degen_ctx,
            &cfg(),
            POOL,
            0,
            6779767,
            10_000,
            9_772,
            HumbleSwapPlan::default(),
        )
        .await
        .unwrap();

        let approve = txns
            .iter()
            .find_map(|t| match &t.body {
                TransactionBody::ApplicationCall { app_id, args, .. }
                    if *app_id == 302189
                        && args.first().map(|a| a.as_slice())
                            == Some(&method_selector(methods::ARC200_APPROVE)[..]) =>
                {
                    Some(args.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(approve[2], uint256_max_arg());
    }

    #[tokio::test]
    async fn test_asa_redeem_path_uses_full_balance() {
        let mut gateway = StubGateway::empty();
        gateway.exchange_apps.insert(302190);
        gateway.asa_balance = 777_000;

        let txns = build_swap(
            &gateway,
            &ctx(),
            &cfg(),
            POOL,
            6779767,
            0,
            10_000,
            9_000,
            HumbleSwapPlan::default(),
        )
        .await
        .unwrap();

        let xfer = txns
            .iter()
            .find_map(|t| match &t.body {
                TransactionBody::AssetTransfer { amount, .. } => Some(*amount),
                _ => None,
            })
            .unwrap();
        assert_eq!(xfer, 777_000);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let gateway = StubGateway::empty();
        let result = build_swap(
            &gateway,
            &ctx(),
            &cfg(),
            POOL,
            424242,
            0,
            10_000,
            9_000,
            HumbleSwapPlan::default(),
        )
        .await;
        assert!(matches!(result, Err(HumbleError::TokenNotInPool(424242))));
    }
}
