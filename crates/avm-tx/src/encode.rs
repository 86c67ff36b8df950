//! Canonical wire encoding
//!
//! The chain's wire format is msgpack with keys in lexicographic order and
//! zero-valued fields omitted. The wire struct below declares its fields in
//! that order; serde emits them as written, and the skip attributes drop
//! empty values.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha512_256};
use thiserror::Error;

use crate::types::{BoxRef, Transaction, TransactionBody};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("box reference to app {0} which is neither the called app nor in foreign apps")]
    UnresolvedBoxApp(u64),

    #[error("msgpack encoding failed: {0}")]
    Msgpack(String),
}

/// Byte string that serializes as msgpack bin (serde's default for byte
/// containers is a sequence, which the chain rejects).
struct Binary<'a>(&'a [u8]);

impl Serialize for Binary<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

/// Sequence of byte strings, each as msgpack bin
struct BinaryList<'a>(&'a [Vec<u8>]);

impl Serialize for BinaryList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(&Binary(item))?;
        }
        seq.end()
    }
}

/// List of 32-byte keys, each as msgpack bin
struct KeyList<'a>(&'a [[u8; 32]]);

impl Serialize for KeyList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(&Binary(item))?;
        }
        seq.end()
    }
}

#[derive(Serialize)]
struct WireBoxRef<'a> {
    #[serde(skip_serializing_if = "is_zero_u64")]
    i: u64,
    n: Binary<'a>,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

// Field names are the wire keys, declared in lexicographic order.
#[derive(Serialize)]
struct WireTransaction<'a> {
    #[serde(skip_serializing_if = "is_zero_u64")]
    aamt: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    amt: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apaa: Option<BinaryList<'a>>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    apan: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apas: Option<&'a [u64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apat: Option<KeyList<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apbx: Option<Vec<WireBoxRef<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apfa: Option<&'a [u64]>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    apid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    arcv: Option<Binary<'a>>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    fee: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    fv: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    gen: &'a str,
    gh: Binary<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grp: Option<Binary<'a>>,
    #[serde(skip_serializing_if = "is_zero_u64")]
    lv: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<Binary<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rcv: Option<Binary<'a>>,
    snd: Binary<'a>,
    #[serde(rename = "type")]
    type_: &'a str,
    #[serde(skip_serializing_if = "is_zero_u64")]
    xaid: u64,
}

fn resolve_box<'a>(
    called_app: u64,
    foreign_apps: &[u64],
    box_ref: &'a BoxRef,
) -> Result<WireBoxRef<'a>, EncodeError> {
    let i = if box_ref.app == called_app || box_ref.app == 0 {
        0
    } else {
        foreign_apps
            .iter()
            .position(|&a| a == box_ref.app)
            .map(|p| p as u64 + 1)
            .ok_or(EncodeError::UnresolvedBoxApp(box_ref.app))?
    };
    Ok(WireBoxRef {
        i,
        n: Binary(&box_ref.name),
    })
}

fn to_wire(tx: &Transaction) -> Result<WireTransaction<'_>, EncodeError> {
    let h = &tx.header;
    let mut wire = WireTransaction {
        aamt: 0,
        amt: None,
        apaa: None,
        apan: 0,
        apas: None,
        apat: None,
        apbx: None,
        apfa: None,
        apid: 0,
        arcv: None,
        fee: h.fee,
        fv: h.first_valid,
        gen: &h.genesis_id,
        gh: Binary(&h.genesis_hash),
        grp: h.group.as_ref().map(|g| Binary(g.as_slice())),
        lv: h.last_valid,
        note: (!h.note.is_empty()).then_some(Binary(&h.note)),
        rcv: None,
        snd: Binary(&h.sender),
        type_: tx.type_tag(),
        xaid: 0,
    };

    match &tx.body {
        TransactionBody::Payment { receiver, amount } => {
            // A zero-amount payment still carries its receiver
            wire.amt = (*amount > 0).then_some(*amount);
            wire.rcv = Some(Binary(receiver.as_slice()));
        }
        TransactionBody::AssetTransfer {
            asset_id,
            receiver,
            amount,
        } => {
            wire.aamt = *amount;
            wire.arcv = Some(Binary(receiver.as_slice()));
            wire.xaid = *asset_id;
        }
        TransactionBody::ApplicationCall {
            app_id,
            on_complete,
            args,
            accounts,
            foreign_apps,
            foreign_assets,
            boxes,
        } => {
            wire.apid = *app_id;
            wire.apan = on_complete.wire_value();
            if !args.is_empty() {
                wire.apaa = Some(BinaryList(args));
            }
            if !accounts.is_empty() {
                wire.apat = Some(KeyList(accounts));
            }
            if !foreign_apps.is_empty() {
                wire.apfa = Some(foreign_apps);
            }
            if !foreign_assets.is_empty() {
                wire.apas = Some(foreign_assets);
            }
            if !boxes.is_empty() {
                let resolved: Result<Vec<_>, _> = boxes
                    .iter()
                    .map(|b| resolve_box(*app_id, foreign_apps, b))
                    .collect();
                wire.apbx = Some(resolved?);
            }
        }
    }

    Ok(wire)
}

/// Encode a transaction to canonical wire bytes.
pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>, EncodeError> {
    let wire = to_wire(tx)?;
    rmp_serde::to_vec_named(&wire).map_err(|e| EncodeError::Msgpack(e.to_string()))
}

/// Domain-separated transaction digest ("TX" prefix, SHA-512/256).
pub fn transaction_digest(tx: &Transaction) -> Result<[u8; 32], EncodeError> {
    let encoded = encode_transaction(tx)?;
    let mut hasher = Sha512_256::new();
    hasher.update(b"TX");
    hasher.update(&encoded);
    Ok(hasher.finalize().into())
}

#[derive(Serialize)]
struct ExportWrapper<'a> {
    txn: WireTransaction<'a>,
}

/// Export an unsigned transaction as base64 for the HTTP response.
pub fn export_unsigned(tx: &Transaction) -> Result<String, EncodeError> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let wire = to_wire(tx)?;
    let bytes = rmp_serde::to_vec_named(&ExportWrapper { txn: wire })
        .map_err(|e| EncodeError::Msgpack(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}
