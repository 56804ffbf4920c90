use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// A field could not be written into its fixed-width slot of the preimage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("{field} value {value} does not fit in a signed 64-bit field")]
    Overflow { field: &'static str, value: u64 },
}

/// Why a block failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyFailure {
    #[error("stored hash does not match the recomputed digest")]
    HashMismatch,
    #[error("hash is not below the difficulty target")]
    TargetNotMet,
    #[error("previous hash does not match the preceding block")]
    BrokenLink,
    #[error("genesis block has a non-empty previous hash")]
    GenesisHasParent,
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("nonce space exhausted after {attempts} attempts at difficulty {difficulty_bits}")]
    SearchExhausted { attempts: u64, difficulty_bits: u32 },

    /// Raised by `append` when the genesis block is missing. Only a
    /// construction bug can get a ledger into this state.
    #[error("ledger invariant violated: no blocks present, genesis is missing")]
    EmptyLedger,

    #[error("difficulty of {0} bits exceeds the 256-bit hash width")]
    InvalidDifficulty(u32),

    #[error("block {index} failed verification: {reason}")]
    Verification { index: usize, reason: VerifyFailure },
}
