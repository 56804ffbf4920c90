use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::constants::GENESIS_PAYLOAD;
use crate::error::Result;
use crate::pow::{PowInput, ProofOfWork};
use crate::Hash;

/// An immutable, sealed ledger record. `nonce` and `hash` are only ever
/// produced by [`ProofOfWork::run`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    timestamp: i64,
    previous_hash: Vec<u8>,
    payload: Vec<u8>,
    nonce: u64,
    hash: Hash,
}

impl Block {
    /// Mine a block stamped with the current Unix time.
    pub fn new(
        payload: impl Into<Vec<u8>>,
        previous_hash: &[u8],
        pow: &ProofOfWork,
    ) -> Result<Block> {
        Self::mine_at(payload, previous_hash, unix_now(), pow)
    }

    /// Mine a block with a caller-chosen timestamp.
    pub fn mine_at(
        payload: impl Into<Vec<u8>>,
        previous_hash: &[u8],
        timestamp: i64,
        pow: &ProofOfWork,
    ) -> Result<Block> {
        let payload = payload.into();
        let (nonce, hash) = pow.run(&PowInput {
            previous_hash,
            payload: &payload,
            timestamp,
        })?;
        debug!(timestamp, nonce, "sealed block");
        Ok(Block {
            timestamp,
            previous_hash: previous_hash.to_vec(),
            payload,
            nonce,
            hash,
        })
    }

    pub fn genesis(pow: &ProofOfWork) -> Result<Block> {
        Self::new(GENESIS_PAYLOAD, &[], pow)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn previous_hash(&self) -> &[u8] {
        &self.previous_hash
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash.is_empty()
    }

    pub(crate) fn pow_input(&self) -> PowInput<'_> {
        PowInput {
            previous_hash: &self.previous_hash,
            payload: &self.payload,
            timestamp: self.timestamp,
        }
    }
}

/// Signed Unix seconds; a clock set before the epoch yields a negative value.
fn unix_now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
