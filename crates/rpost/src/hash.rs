//! The single hash discipline used throughout an rpost instance.
//!
//! `id` (the commitment) is never used as hasher initialization material:
//! every call site that must bind to the commitment passes it as an explicit
//! leading argument. This keeps the wrapper a pure function of its inputs
//! with no per-instance hasher state.

use sha2::{Digest, Sha256};

/// Output width of [`hash`] in bytes. Matches `K / 8` for the fixed `K = 256`
/// bit hash output used throughout the protocol.
pub const DIGEST_LEN: usize = 32;

/// Hashes the concatenation of `parts` with SHA-256.
///
/// Equivalent to the source's `HashFunc::Hash(data ...[]byte)`: arguments are
/// concatenated in order with no length-prefixing, which is sound here
/// because every call site either hashes a fixed number of fixed-width
/// arguments, or places its only variable-width argument last.
#[must_use]
pub fn hash(parts: &[&[u8]]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
