//! A single-process, append-only ledger whose blocks are sealed by a
//! SHA-256 proof-of-work search.
//!
//! [`Ledger`] owns the chain and mines every block it appends through a
//! [`ProofOfWork`] built from an explicit [`PowConfig`]. The preimage that
//! gets hashed is defined in [`codec`].

pub mod block;
pub mod codec;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod pow;

pub use block::Block;
pub use error::{EncodingError, LedgerError, Result, VerifyFailure};
pub use ledger::Ledger;
pub use pow::{PowConfig, PowInput, ProofOfWork};

pub type Hash = [u8; constants::HASH_SIZE];
