//! Canonical byte layout of the proof-of-work preimage.
//!
//! ```text
//! previous_hash || payload || timestamp:i64be || difficulty_bits:i64be || nonce:i64be
//! ```
//!
//! The two variable-length fields are written without length prefixes, so
//! `("ab", "c")` and `("a", "bc")` encode to the same prefix. Every stored
//! hash depends on this layout, so it stays as is.

use crate::constants::INT_FIELD_SIZE;
use crate::error::EncodingError;

/// Encode the full preimage for one nonce.
pub fn serialize(
    previous_hash: &[u8],
    payload: &[u8],
    timestamp: i64,
    difficulty_bits: u32,
    nonce: u64,
) -> Result<Vec<u8>, EncodingError> {
    let mut preimage = Preimage::new(previous_hash, payload, timestamp, difficulty_bits);
    preimage.set_nonce(nonce)?;
    Ok(preimage.into_bytes())
}

/// Fixed-width big-endian encoding of a signed 64-bit field.
pub fn encode_i64(value: i64) -> [u8; INT_FIELD_SIZE] {
    value.to_be_bytes()
}

/// Nonces are unsigned in memory but occupy a signed field on the wire.
pub fn encode_nonce(nonce: u64) -> Result<[u8; INT_FIELD_SIZE], EncodingError> {
    let value = i64::try_from(nonce).map_err(|_| EncodingError::Overflow {
        field: "nonce",
        value: nonce,
    })?;
    Ok(encode_i64(value))
}

/// A preimage buffer whose fixed prefix is encoded once; only the trailing
/// nonce field is rewritten between attempts.
#[derive(Clone, Debug)]
pub struct Preimage {
    bytes: Vec<u8>,
    nonce_at: usize,
}

impl Preimage {
    pub fn new(previous_hash: &[u8], payload: &[u8], timestamp: i64, difficulty_bits: u32) -> Self {
        let mut bytes =
            Vec::with_capacity(previous_hash.len() + payload.len() + 3 * INT_FIELD_SIZE);
        bytes.extend_from_slice(previous_hash);
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(&encode_i64(timestamp));
        bytes.extend_from_slice(&encode_i64(i64::from(difficulty_bits)));
        let nonce_at = bytes.len();
        bytes.extend_from_slice(&[0u8; INT_FIELD_SIZE]);
        Self { bytes, nonce_at }
    }

    pub fn set_nonce(&mut self, nonce: u64) -> Result<(), EncodingError> {
        let encoded = encode_nonce(nonce)?;
        self.bytes[self.nonce_at..].copy_from_slice(&encoded);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
