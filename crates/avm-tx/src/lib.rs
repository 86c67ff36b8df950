//! avm-tx: Transaction building utilities
//!
//! Transactions are immutable value records assembled by the DEX adapters and
//! grouped in a second pass. Group-id assignment is the only mutation point.

pub mod abi;
pub mod address;
pub mod encode;
pub mod group;
pub mod types;

pub use abi::{
    address_arg, decode_uint256, method_selector, uint256_arg, uint256_max_arg, uint64_arg,
    BoxName,
};
pub use address::{app_address, decode_address, encode_address, AddressError};
pub use encode::{encode_transaction, export_unsigned, transaction_digest, EncodeError};
pub use group::{assign_group_id, compute_group_id, GroupError};
pub use types::{
    balance_box_refs, BoxRef, OnComplete, Transaction, TransactionBody, TransactionHeader,
};
