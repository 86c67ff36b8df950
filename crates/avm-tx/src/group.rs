//! Atomic group assignment
//!
//! A group id is the SHA-512/256 of "TG" plus the msgpack list of the member
//! transactions' digests, computed with no group field set. All members carry
//! the same id; the chain executes all of them or none.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha512_256};
use thiserror::Error;

use crate::encode::{transaction_digest, EncodeError};
use crate::types::Transaction;

/// The chain rejects groups larger than this.
pub const MAX_GROUP_SIZE: usize = 16;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("cannot group an empty transaction list")]
    Empty,

    #[error("group of {0} transactions exceeds the chain limit of {MAX_GROUP_SIZE}")]
    TooLarge(usize),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

struct DigestList<'a>(&'a [[u8; 32]]);

impl Serialize for DigestList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Bin<'b>(&'b [u8]);
        impl Serialize for Bin<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bytes(self.0)
            }
        }
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for d in self.0 {
            seq.serialize_element(&Bin(d))?;
        }
        seq.end()
    }
}

#[derive(Serialize)]
struct TxGroup<'a> {
    txlist: DigestList<'a>,
}

/// Compute the group id over a sequence of transactions. Any group fields
/// already present are ignored (digests are taken groupless).
pub fn compute_group_id(txs: &[Transaction]) -> Result<[u8; 32], GroupError> {
    if txs.is_empty() {
        return Err(GroupError::Empty);
    }
    if txs.len() > MAX_GROUP_SIZE {
        return Err(GroupError::TooLarge(txs.len()));
    }

    let mut digests = Vec::with_capacity(txs.len());
    for tx in txs {
        let groupless = if tx.header.group.is_some() {
            let mut t = tx.clone();
            t.header.group = None;
            transaction_digest(&t)?
        } else {
            transaction_digest(tx)?
        };
        digests.push(groupless);
    }

    let encoded = rmp_serde::to_vec_named(&TxGroup {
        txlist: DigestList(&digests),
    })
    .map_err(|e| GroupError::Encode(EncodeError::Msgpack(e.to_string())))?;

    let mut hasher = Sha512_256::new();
    hasher.update(b"TG");
    hasher.update(&encoded);
    Ok(hasher.finalize().into())
}

/// Clear any existing group ids, then stamp the shared id on every member.
pub fn assign_group_id(txs: &mut [Transaction]) -> Result<[u8; 32], GroupError> {
    for tx in txs.iter_mut() {
        tx.header.group = None;
    }
    let gid = compute_group_id(txs)?;
    for tx in txs.iter_mut() {
        tx.header.group = Some(gid);
    }
    Ok(gid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionHeader;

    fn header() -> TransactionHeader {
        TransactionHeader::new([1; 32], 1000, 100, 1100, "voi-v1".into(), [9; 32])
    }

    #[test]
    fn test_group_id_identical_and_nonzero() {
        let mut txs = vec![
            Transaction::payment(header(), [2; 32], 100),
            Transaction::payment(header(), [3; 32], 200),
        ];
        let gid = assign_group_id(&mut txs).unwrap();
        assert_ne!(gid, [0u8; 32]);
        for tx in &txs {
            assert_eq!(tx.header.group, Some(gid));
        }
    }

    #[test]
    fn test_stale_group_ids_ignored() {
        let mut txs = vec![
            Transaction::payment(header(), [2; 32], 100),
            Transaction::payment(header(), [3; 32], 200),
        ];
        let clean = compute_group_id(&txs).unwrap();

        // Stamp a bogus id first; assignment must clear it before digesting
        txs[0].header.group = Some([7u8; 32]);
        let gid = assign_group_id(&mut txs).unwrap();
        assert_eq!(gid, clean);
    }

    #[test]
    fn test_group_id_depends_on_order() {
        let a = Transaction::payment(header(), [2; 32], 100);
        let b = Transaction::payment(header(), [3; 32], 200);
        let fwd = compute_group_id(&[a.clone(), b.clone()]).unwrap();
        let rev = compute_group_id(&[b, a]).unwrap();
        assert_ne!(fwd, rev);
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(matches!(compute_group_id(&[]), Err(GroupError::Empty)));
    }

    #[test]
    fn test_oversized_group_rejected() {
        let txs: Vec<Transaction> = (0..17)
            .map(|i| Transaction::payment(header(), [i as u8; 32], 1))
            .collect();
        assert!(matches!(
            compute_group_id(&txs),
            Err(GroupError::TooLarge(17))
        ));
    }
}
