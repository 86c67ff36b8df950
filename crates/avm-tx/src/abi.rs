//! ABI call helpers
//!
//! Method selectors are the first four bytes of the SHA-512/256 of the method
//! signature. Transaction-typed arguments ride as preceding transactions in
//! the group and are not part of the argument list.

use sha2::{Digest, Sha512_256};

/// Compute the 4-byte method selector for a signature like
/// `"swapAForB(uint64,uint256,uint256)uint256"`.
pub fn method_selector(signature: &str) -> [u8; 4] {
    let digest = Sha512_256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

/// Encode a uint64 argument (8 bytes, big-endian).
pub fn uint64_arg(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Encode a uint256 argument (32 bytes, big-endian) from a u64 value.
pub fn uint256_arg(value: u64) -> Vec<u8> {
    let mut out = vec![0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

/// The maximal uint256 argument, used for unlimited allowances.
pub fn uint256_max_arg() -> Vec<u8> {
    vec![0xff; 32]
}

/// Encode an address argument (the raw 32-byte public key).
pub fn address_arg(pubkey: &[u8; 32]) -> Vec<u8> {
    pubkey.to_vec()
}

/// Decode a big-endian uint256 into a u64, clamping values beyond the u64
/// range. Amounts in this system are u64 token units; anything larger only
/// occurs on broken contracts.
pub fn decode_uint256(bytes: &[u8]) -> u64 {
    if bytes.len() > 8 && bytes[..bytes.len() - 8].iter().any(|&b| b != 0) {
        return u64::MAX;
    }
    let tail = if bytes.len() >= 8 {
        &bytes[bytes.len() - 8..]
    } else {
        bytes
    };
    let mut value: u64 = 0;
    for &b in tail {
        value = (value << 8) | b as u64;
    }
    value
}

/// Name of a per-address storage box: `prefix || pubkey`.
pub struct BoxName;

impl BoxName {
    pub fn balances(pubkey: &[u8; 32]) -> Vec<u8> {
        let mut name = b"balances".to_vec();
        name.extend_from_slice(pubkey);
        name
    }

    pub fn approvals(owner: &[u8; 32], spender: &[u8; 32]) -> Vec<u8> {
        let mut name = b"approvals".to_vec();
        name.extend_from_slice(owner);
        name.extend_from_slice(spender);
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_four_bytes_and_stable() {
        let a = method_selector("arc200_transfer(address,uint256)bool");
        let b = method_selector("arc200_transfer(address,uint256)bool");
        let c = method_selector("arc200_approve(address,uint256)bool");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_uint64_arg() {
        assert_eq!(uint64_arg(1), vec![0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_uint256_arg_right_aligned() {
        let arg = uint256_arg(0x0102);
        assert_eq!(arg.len(), 32);
        assert_eq!(&arg[..30], &[0u8; 30]);
        assert_eq!(&arg[30..], &[0x01, 0x02]);
    }

    #[test]
    fn test_uint256_round_trip() {
        assert_eq!(decode_uint256(&uint256_arg(0)), 0);
        assert_eq!(decode_uint256(&uint256_arg(123_456_789)), 123_456_789);
        assert_eq!(decode_uint256(&uint256_arg(u64::MAX)), u64::MAX);
    }

    #[test]
    fn test_uint256_overflow_clamps() {
        let mut bytes = vec![0u8; 32];
        bytes[23] = 1; // 2^64
        assert_eq!(decode_uint256(&bytes), u64::MAX);
    }

    #[test]
    fn test_box_names() {
        let balances = BoxName::balances(&[5; 32]);
        assert_eq!(&balances[..8], b"balances");
        assert_eq!(balances.len(), 8 + 32);

        let approvals = BoxName::approvals(&[5; 32], &[6; 32]);
        assert_eq!(&approvals[..9], b"approvals");
        assert_eq!(approvals.len(), 9 + 64);
    }
}
