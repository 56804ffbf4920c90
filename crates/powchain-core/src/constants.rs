pub const BYTE: usize = 8;
pub const HASH_SIZE: usize = 32;
pub const HASH_BITS: u32 = (HASH_SIZE * BYTE) as u32;
/// Width of every fixed-size integer field in the hash preimage.
pub const INT_FIELD_SIZE: usize = 8;
pub const MAX_DIFFICULTY_BITS: u32 = HASH_BITS;
pub const DEFAULT_DIFFICULTY_BITS: u32 = 32;
pub const DEFAULT_MAX_NONCE: u64 = i64::MAX as u64;
pub const GENESIS_PAYLOAD: &str = "hello block chain";
/// How many attempts pass between progress events during a search.
pub const PROGRESS_INTERVAL: u64 = 1 << 20;
