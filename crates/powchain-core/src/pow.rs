use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, trace, warn};

use crate::codec::Preimage;
use crate::constants::{
    DEFAULT_DIFFICULTY_BITS, DEFAULT_MAX_NONCE, HASH_BITS, HASH_SIZE, MAX_DIFFICULTY_BITS,
    PROGRESS_INTERVAL,
};
use crate::error::{EncodingError, LedgerError, Result, VerifyFailure};
use crate::{Block, Hash};

/// Search parameters, fixed for the lifetime of a [`ProofOfWork`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowConfig {
    /// Required leading zero bits; the target is `2^(256 - difficulty_bits)`.
    pub difficulty_bits: u32,
    /// Exclusive upper bound of the nonce search.
    pub max_nonce: u64,
}

impl Default for PowConfig {
    fn default() -> Self {
        Self {
            difficulty_bits: DEFAULT_DIFFICULTY_BITS,
            max_nonce: DEFAULT_MAX_NONCE,
        }
    }
}

impl PowConfig {
    pub fn with_difficulty(difficulty_bits: u32) -> Self {
        Self {
            difficulty_bits,
            ..Self::default()
        }
    }
}

/// The committed fields of a block that has not been sealed yet.
#[derive(Clone, Copy, Debug)]
pub struct PowInput<'a> {
    pub previous_hash: &'a [u8],
    pub payload: &'a [u8],
    pub timestamp: i64,
}

#[derive(Clone, Debug)]
pub struct ProofOfWork {
    config: PowConfig,
}

impl ProofOfWork {
    pub fn new(config: PowConfig) -> Result<Self> {
        if config.difficulty_bits > MAX_DIFFICULTY_BITS {
            return Err(LedgerError::InvalidDifficulty(config.difficulty_bits));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &PowConfig {
        &self.config
    }

    pub fn difficulty_bits(&self) -> u32 {
        self.config.difficulty_bits
    }

    /// The target as a big-endian 256-bit integer, or `None` at difficulty 0
    /// where the target is `2^256` and every hash qualifies.
    pub fn target_bytes(&self) -> Option<Hash> {
        if self.config.difficulty_bits == 0 {
            return None;
        }
        let bit = (HASH_BITS - self.config.difficulty_bits) as usize;
        let mut target = [0u8; HASH_SIZE];
        target[HASH_SIZE - 1 - bit / 8] = 1 << (bit % 8);
        Some(target)
    }

    /// `hash < 2^(256 - d)` holds exactly when the hash has at least `d`
    /// leading zero bits.
    pub fn is_admissible(&self, hash: &Hash) -> bool {
        count_leading_zero_bits(hash) >= self.config.difficulty_bits
    }

    /// The only place a block hash is computed.
    pub fn digest(
        &self,
        input: &PowInput<'_>,
        nonce: u64,
    ) -> std::result::Result<Hash, EncodingError> {
        let mut preimage = self.preimage(input);
        preimage.set_nonce(nonce)?;
        Ok(sha256(preimage.as_bytes()))
    }

    /// Search nonces upward from zero and return the first one whose digest
    /// is admissible, together with that digest.
    pub fn run(&self, input: &PowInput<'_>) -> Result<(u64, Hash)> {
        let difficulty_bits = self.config.difficulty_bits;
        let mut preimage = self.preimage(input);
        debug!(
            difficulty_bits,
            max_nonce = self.config.max_nonce,
            payload_len = input.payload.len(),
            "starting proof-of-work search"
        );

        let mut nonce = 0u64;
        while nonce < self.config.max_nonce {
            preimage.set_nonce(nonce)?;
            let hash = sha256(preimage.as_bytes());
            if self.is_admissible(&hash) {
                info!(nonce, hash = %hex::encode(hash), "found admissible hash");
                return Ok((nonce, hash));
            }
            nonce += 1;
            if nonce % PROGRESS_INTERVAL == 0 {
                trace!(nonce, "proof-of-work still searching");
            }
        }

        warn!(attempts = nonce, difficulty_bits, "nonce space exhausted");
        Err(LedgerError::SearchExhausted {
            attempts: nonce,
            difficulty_bits,
        })
    }

    /// Recompute a block's digest and check it against the stored hash and
    /// the target.
    pub fn verify(&self, block: &Block) -> std::result::Result<(), VerifyFailure> {
        let recomputed = self.digest(&block.pow_input(), block.nonce())?;
        if &recomputed != block.hash() {
            return Err(VerifyFailure::HashMismatch);
        }
        if !self.is_admissible(block.hash()) {
            return Err(VerifyFailure::TargetNotMet);
        }
        Ok(())
    }

    fn preimage(&self, input: &PowInput<'_>) -> Preimage {
        Preimage::new(
            input.previous_hash,
            input.payload,
            input.timestamp,
            self.config.difficulty_bits,
        )
    }
}

pub fn sha256(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(&digest[..]);
    out
}

pub fn count_leading_zero_bits(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 8;
        } else {
            total += b.leading_zeros();
            break;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::constants::GENESIS_PAYLOAD;

    fn genesis_input() -> PowInput<'static> {
        PowInput {
            previous_hash: &[],
            payload: GENESIS_PAYLOAD.as_bytes(),
            timestamp: 1_600_000_000,
        }
    }

    fn pow(difficulty_bits: u32) -> ProofOfWork {
        ProofOfWork::new(PowConfig::with_difficulty(difficulty_bits)).unwrap()
    }

    #[test]
    fn leading_zero_bits_examples() {
        let mut h = [0u8; 32];
        assert_eq!(count_leading_zero_bits(&h), 256);
        h[0] = 0x0F; // 00001111
        assert_eq!(count_leading_zero_bits(&h), 4);
        h = [0u8; 32];
        h[1] = 0x80; // 00000000 10000000
        assert_eq!(count_leading_zero_bits(&h), 8);
        h[1] = 0x40; // 01000000
        assert_eq!(count_leading_zero_bits(&h), 9);
    }

    #[test]
    fn default_config_is_reference_difficulty() {
        let config = PowConfig::default();
        assert_eq!(config.difficulty_bits, 32);
        assert_eq!(config.max_nonce, i64::MAX as u64);
    }

    #[test]
    fn config_fills_missing_fields_from_defaults() {
        let config: PowConfig = serde_json::from_str(r#"{"difficulty_bits":12}"#).unwrap();
        assert_eq!(config, PowConfig::with_difficulty(12));
    }

    #[test]
    fn rejects_difficulty_wider_than_hash() {
        assert!(ProofOfWork::new(PowConfig::with_difficulty(256)).is_ok());
        assert_eq!(
            ProofOfWork::new(PowConfig::with_difficulty(257)).unwrap_err(),
            LedgerError::InvalidDifficulty(257)
        );
    }

    #[test]
    fn target_bytes_place_single_bit() {
        let t = pow(32).target_bytes().unwrap();
        let mut expected = [0u8; 32];
        expected[3] = 1; // 2^224
        assert_eq!(t, expected);

        let t = pow(1).target_bytes().unwrap();
        assert_eq!(t[0], 0x80);

        let t = pow(256).target_bytes().unwrap();
        assert_eq!(t[31], 1);
        assert_eq!(&t[..31], &[0u8; 31]);

        assert!(pow(0).target_bytes().is_none());
    }

    #[test]
    fn admission_agrees_with_big_endian_comparison() {
        let p = pow(12);
        let target = p.target_bytes().unwrap();
        assert_eq!(&target[..2], &[0x00, 0x10]);
        // 0x000fff.. is the largest admissible hash at 12 bits
        let below = {
            let mut b = [0xffu8; 32];
            b[0] = 0;
            b[1] = 0x0f;
            b
        };
        assert!(below < target);
        assert!(p.is_admissible(&below));
        assert!(!p.is_admissible(&target));
        assert!(pow(0).is_admissible(&[0xff; 32]));
    }

    #[test]
    fn digest_known_answer() {
        let hash = pow(16).digest(&genesis_input(), 0).unwrap();
        assert_eq!(
            hex::encode(hash),
            "33334b2bd46c8c3c8ec82c6ee95a98fb9631ec1c6972f36ec5ece49a3ac374a3"
        );
    }

    #[test]
    fn digest_hashes_codec_output() {
        let p = pow(16);
        let input = genesis_input();
        let bytes = codec::serialize(input.previous_hash, input.payload, input.timestamp, 16, 77)
            .unwrap();
        assert_eq!(p.digest(&input, 77).unwrap(), sha256(&bytes));
    }

    #[test]
    fn digest_rejects_unrepresentable_nonce() {
        assert!(matches!(
            pow(16).digest(&genesis_input(), u64::MAX),
            Err(EncodingError::Overflow { field: "nonce", .. })
        ));
    }

    #[test]
    fn run_finds_first_admissible_nonce() {
        let (nonce, hash) = pow(16).run(&genesis_input()).unwrap();
        assert_eq!(nonce, 42_465);
        assert_eq!(
            hex::encode(hash),
            "0000e35d2fda08f6799ea0c913583d248c55ac2e9fa1d10cfef3dd334343bab5"
        );
    }

    #[test]
    fn run_returns_smallest_nonce() {
        let p = pow(8);
        let input = genesis_input();
        let (nonce, _) = p.run(&input).unwrap();
        assert_eq!(nonce, 45);
        for earlier in 0..nonce {
            assert!(!p.is_admissible(&p.digest(&input, earlier).unwrap()));
        }
    }

    #[test]
    fn run_is_deterministic() {
        let p = pow(10);
        let input = PowInput {
            previous_hash: &[1, 2, 3],
            payload: b"Send 1 BTC to Ivan",
            timestamp: 1_700_000_000,
        };
        assert_eq!(p.run(&input).unwrap(), p.run(&input).unwrap());
    }

    #[test]
    fn difficulty_zero_accepts_nonce_zero() {
        let (nonce, _) = pow(0).run(&genesis_input()).unwrap();
        assert_eq!(nonce, 0);
    }

    #[test]
    fn run_reports_exhaustion() {
        let p = ProofOfWork::new(PowConfig {
            difficulty_bits: 256,
            max_nonce: 64,
        })
        .unwrap();
        assert_eq!(
            p.run(&genesis_input()).unwrap_err(),
            LedgerError::SearchExhausted {
                attempts: 64,
                difficulty_bits: 256
            }
        );
    }

    #[test]
    fn empty_search_space_is_exhausted_immediately() {
        let p = ProofOfWork::new(PowConfig {
            difficulty_bits: 0,
            max_nonce: 0,
        })
        .unwrap();
        assert!(matches!(
            p.run(&genesis_input()),
            Err(LedgerError::SearchExhausted { attempts: 0, .. })
        ));
    }
}
