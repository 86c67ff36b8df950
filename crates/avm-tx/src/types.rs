//! Transaction value records
//!
//! These are plain data. Adapters build them, the group builder orders them
//! and stamps the group id, and `encode` turns them into wire bytes.

use voiswap_core::{AppId, AssetId};

/// Application-call completion action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnComplete {
    #[default]
    NoOp,
    OptIn,
}

impl OnComplete {
    pub fn wire_value(self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::OptIn => 1,
        }
    }
}

/// Reference to a contract storage box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRef {
    /// Application that owns the box; 0 means the called application
    pub app: AppId,
    pub name: Vec<u8>,
}

/// Fields common to every transaction
#[derive(Debug, Clone)]
pub struct TransactionHeader {
    pub sender: [u8; 32],
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: [u8; 32],
    pub note: Vec<u8>,
    pub group: Option<[u8; 32]>,
}

impl TransactionHeader {
    pub fn new(
        sender: [u8; 32],
        fee: u64,
        first_valid: u64,
        last_valid: u64,
        genesis_id: String,
        genesis_hash: [u8; 32],
    ) -> Self {
        Self {
            sender,
            fee,
            first_valid,
            last_valid,
            genesis_id,
            genesis_hash,
            note: Vec::new(),
            group: None,
        }
    }
}

/// Type-specific transaction fields
#[derive(Debug, Clone)]
pub enum TransactionBody {
    Payment {
        receiver: [u8; 32],
        amount: u64,
    },
    AssetTransfer {
        asset_id: AssetId,
        receiver: [u8; 32],
        amount: u64,
    },
    ApplicationCall {
        app_id: AppId,
        on_complete: OnComplete,
        args: Vec<Vec<u8>>,
        accounts: Vec<[u8; 32]>,
        foreign_apps: Vec<AppId>,
        foreign_assets: Vec<AssetId>,
        boxes: Vec<BoxRef>,
    },
}

/// One unsigned transaction
#[derive(Debug, Clone)]
pub struct Transaction {
    pub header: TransactionHeader,
    pub body: TransactionBody,
}

impl Transaction {
    pub fn payment(header: TransactionHeader, receiver: [u8; 32], amount: u64) -> Self {
        Self {
            header,
            body: TransactionBody::Payment { receiver, amount },
        }
    }

    pub fn asset_transfer(
        header: TransactionHeader,
        asset_id: AssetId,
        receiver: [u8; 32],
        amount: u64,
    ) -> Self {
        Self {
            header,
            body: TransactionBody::AssetTransfer {
                asset_id,
                receiver,
                amount,
            },
        }
    }

    pub fn type_tag(&self) -> &'static str {
        match self.body {
            TransactionBody::Payment { .. } => "pay",
            TransactionBody::AssetTransfer { .. } => "axfer",
            TransactionBody::ApplicationCall { .. } => "appl",
        }
    }
}

/// Box references an ARC200 method call must declare: one `balances` box per
/// involved address, on the given contract.
pub fn balance_box_refs(contract: AppId, addresses: &[[u8; 32]]) -> Vec<BoxRef> {
    addresses
        .iter()
        .map(|pk| {
            let mut name = b"balances".to_vec();
            name.extend_from_slice(pk);
            BoxRef {
                app: contract,
                name,
            }
        })
        .collect()
}
