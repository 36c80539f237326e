use thiserror::Error;

use crate::binstring::InvalidIdentifierError;

/// A store I/O failure, tagged with the operation and position that failed so
/// callers don't have to reopen the file to figure out where things went wrong.
#[derive(Debug, Error)]
pub enum StoreIoError {
    #[error("failed to {operation} store file {path} at index {index}")]
    AtIndex {
        operation: &'static str,
        path: String,
        index: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to {operation} store file {path}")]
    Other {
        operation: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the iPoW table generator.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(
        "failed to find an accepting nonce for table index {index} within the permitted range \
         of {max_nonce} attempts"
    )]
    NonceOverflow { index: u64, max_nonce: u64 },
    #[error(transparent)]
    Store(#[from] StoreIoError),
    #[error(transparent)]
    Params(#[from] ParameterOutOfRangeError),
}

/// Errors raised while writing or reading the Merkle tree label store.
#[derive(Debug, Error)]
pub enum MerkleError {
    #[error("label for node {identifier} is missing from the tree store")]
    LabelMissing { identifier: String },
    #[error(transparent)]
    Identifier(#[from] InvalidIdentifierError),
    #[error(transparent)]
    Store(#[from] StoreIoError),
}

/// Parameters fell outside the ranges this crate supports.
#[derive(Debug, Error)]
pub enum ParameterOutOfRangeError {
    #[error("n must satisfy 1 <= n <= 63, got {0}")]
    N(u32),
    #[error("l must satisfy 1 <= l <= 63, got {0}")]
    L(u32),
}

/// Errors raised while assembling a proof.
#[derive(Debug, Error)]
pub enum ProverError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
}

/// The crate-level error type: every fallible operation eventually converts into this,
/// so callers working at the `Table`/`Tree`/`Prover` level only need to match on one type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifierError),
    #[error(transparent)]
    ParameterOutOfRange(#[from] ParameterOutOfRangeError),
    #[error(transparent)]
    Store(#[from] StoreIoError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error(transparent)]
    Prover(#[from] ProverError),
    #[cfg(feature = "config")]
    #[error("failed to load parameters from the environment")]
    Config(#[from] figment::Error),
}
