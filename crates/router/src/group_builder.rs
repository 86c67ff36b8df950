//! Atomic group assembly
//!
//! Concatenates the adapters' per-pool sequences in hop-then-split order,
//! appends the platform-fee transfer when one applies, and stamps a single
//! group id over the whole sequence.

use avm_tx::{
    address_arg, assign_group_id, balance_box_refs, decode_address, export_unsigned,
    method_selector, uint256_arg, OnComplete, Transaction, TransactionBody, TransactionHeader,
};
use voiswap_core::{BuildError, ChainGateway, Error, SwapContext, TokenKind};

use crate::adapters::{build_pool_swap, token_kind_in_pool, wrapped_form};
use crate::state::{HopSplit, PlannedSwap};

const ARC200_TRANSFER_SIG: &str = "arc200_transfer(address,uint256)bool";

/// The assembled atomic group
#[derive(Debug)]
pub struct BuiltGroup {
    pub transactions: Vec<Transaction>,
    /// Base64 canonical encodings, in group order
    pub encoded: Vec<String>,
    pub group_id: [u8; 32],
    /// Sum of the flat per-transaction fees, for display
    pub network_fee: u64,
}

/// Whether two adjacent hops can hand the intermediate token over in wrapped
/// form: every slice on both sides must leave/expect the same wrapped
/// contract.
fn chainable(prev: &HopSplit, next: &HopSplit) -> bool {
    let token = prev.to;
    let mut form = None;
    for slice in prev.slices.iter().chain(next.slices.iter()) {
        match wrapped_form(&slice.pool, token) {
            Some(w) => {
                if *form.get_or_insert(w) != w {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

/// Build the full atomic transaction group executing a plan.
pub async fn build_swap_group(
    gateway: &dyn ChainGateway,
    ctx: &SwapContext,
    plan: &PlannedSwap,
) -> Result<BuiltGroup, Error> {
    let hop_count = plan.hops.len();
    let single_hop = hop_count == 1;

    let mut transactions: Vec<Transaction> = Vec::new();

    for (hop_idx, hop) in plan.hops.iter().enumerate() {
        let skip_deposit = hop_idx > 0 && chainable(&plan.hops[hop_idx - 1], hop);
        let skip_withdraw =
            hop_idx + 1 < hop_count && chainable(hop, &plan.hops[hop_idx + 1]);

        for slice in &hop.slices {
            let txns = build_pool_swap(
                gateway,
                ctx,
                &slice.pool,
                hop.from,
                hop.to,
                slice.amount_in,
                slice.min_out,
                skip_deposit,
                skip_withdraw,
                single_hop,
            )
            .await?;
            transactions.extend(txns);
        }
    }

    // Platform fee rides last, typed by the output token
    if let Some(fee) = plan.platform_fee.as_ref().filter(|f| f.applied) {
        let final_hop = plan.final_hop();
        let slice = final_hop
            .slices
            .first()
            .ok_or_else(|| Error::Build(BuildError::BuildFailed {
                message: "final hop has no slices".into(),
            }))?;
        let dest = decode_address(&fee.fee_address).map_err(|_| {
            Error::Build(BuildError::InvalidAddress {
                address: fee.fee_address.clone(),
            })
        })?;

        let header = TransactionHeader::new(
            ctx.sender_pk,
            ctx.params.min_fee,
            ctx.params.first_valid,
            ctx.params.last_valid,
            ctx.params.genesis_id.clone(),
            ctx.params.genesis_hash,
        );

        let fee_txn = match token_kind_in_pool(&slice.pool, final_hop.to) {
            TokenKind::Native => Transaction::payment(header, dest, fee.fee_amount),
            TokenKind::Asa => {
                Transaction::asset_transfer(header, final_hop.to, dest, fee.fee_amount)
            }
            TokenKind::Arc200 => Transaction {
                header,
                body: TransactionBody::ApplicationCall {
                    app_id: final_hop.to,
                    on_complete: OnComplete::NoOp,
                    args: vec![
                        method_selector(ARC200_TRANSFER_SIG).to_vec(),
                        address_arg(&dest),
                        uint256_arg(fee.fee_amount),
                    ],
                    accounts: vec![],
                    foreign_apps: vec![],
                    foreign_assets: vec![],
                    boxes: balance_box_refs(final_hop.to, &[ctx.sender_pk, dest]),
                },
            },
        };
        transactions.push(fee_txn);
    }

    let group_id = assign_group_id(&mut transactions).map_err(|e| {
        Error::Build(BuildError::BuildFailed {
            message: e.to_string(),
        })
    })?;

    let encoded = transactions
        .iter()
        .map(export_unsigned)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            Error::Build(BuildError::EncodingFailed {
                message: e.to_string(),
            })
        })?;

    let network_fee = transactions.iter().map(|t| t.header.fee).sum();

    Ok(BuiltGroup {
        transactions,
        encoded,
        group_id,
        network_fee,
    })
}
