//! Address codec
//!
//! Addresses are the Base32 encoding (RFC 4648 alphabet, no padding) of a
//! 32-byte public key followed by a 4-byte SHA-512/256 checksum, 58 chars.

use sha2::{Digest, Sha512_256};
use thiserror::Error;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const ADDRESS_LEN: usize = 58;
const PUBKEY_LEN: usize = 32;
const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must be {ADDRESS_LEN} characters, got {0}")]
    BadLength(usize),

    #[error("invalid Base32 character {0:?}")]
    BadCharacter(char),

    #[error("address checksum mismatch")]
    BadChecksum,
}

fn checksum(pubkey: &[u8; PUBKEY_LEN]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha512_256::digest(pubkey);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[PUBKEY_LEN - CHECKSUM_LEN..]);
    out
}

/// Encode a 32-byte public key as an address string.
pub fn encode_address(pubkey: &[u8; PUBKEY_LEN]) -> String {
    let mut data = [0u8; PUBKEY_LEN + CHECKSUM_LEN];
    data[..PUBKEY_LEN].copy_from_slice(pubkey);
    data[PUBKEY_LEN..].copy_from_slice(&checksum(pubkey));
    base32_encode(&data)
}

/// Decode an address string into its 32-byte public key, verifying the
/// checksum.
pub fn decode_address(address: &str) -> Result<[u8; PUBKEY_LEN], AddressError> {
    if address.len() != ADDRESS_LEN {
        return Err(AddressError::BadLength(address.len()));
    }

    let data = base32_decode(address)?;
    let mut pubkey = [0u8; PUBKEY_LEN];
    pubkey.copy_from_slice(&data[..PUBKEY_LEN]);

    if data[PUBKEY_LEN..PUBKEY_LEN + CHECKSUM_LEN] != checksum(&pubkey) {
        return Err(AddressError::BadChecksum);
    }

    Ok(pubkey)
}

/// Escrow public key of an application account:
/// SHA-512/256 of `"appID" || big-endian app id`.
pub fn app_address(app_id: u64) -> [u8; PUBKEY_LEN] {
    let mut hasher = Sha512_256::new();
    hasher.update(b"appID");
    hasher.update(app_id.to_be_bytes());
    hasher.finalize().into()
}

fn base32_encode(data: &[u8]) -> String {
    let mut out = String::new();
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}

fn base32_decode(s: &str) -> Result<Vec<u8>, AddressError> {
    let mut out = Vec::with_capacity(PUBKEY_LEN + CHECKSUM_LEN);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for c in s.chars() {
        let value = ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or(AddressError::BadCharacter(c))? as u32;
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
        }
    }

    out.truncate(PUBKEY_LEN + CHECKSUM_LEN);
    Ok(out)
}
