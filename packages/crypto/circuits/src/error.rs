//! Error types for witness construction and proving

use thiserror::Error;

/// A witness that does not satisfy the vote relation, or a tree operation
/// that cannot produce one.
///
/// Variants are ordered like the relation checks: the first violated step
/// is the one reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("invalid Merkle path length: got {got}, expected {expected}")]
    PathLength { got: usize, expected: usize },

    #[error("path index at level {level} is not 0 or 1")]
    PathIndexNotBinary { level: usize },

    #[error("computed root does not match the public root")]
    RootMismatch,

    #[error("nullifier hash does not match hash(secret, proposalId)")]
    NullifierMismatch,

    #[error("vote must be 0 or 1")]
    VoteNotBoolean,

    #[error("leaf index {index} out of range ({len} leaves inserted)")]
    LeafIndexOutOfRange { index: u64, len: u64 },

    #[error("membership tree is full (capacity {capacity})")]
    TreeFull { capacity: u64 },

    #[error("unsupported tree depth {0} (must be 1..=32)")]
    InvalidDepth(usize),
}

/// Failures of the proving pipeline (params, keygen, proof generation).
#[derive(Debug, Error)]
pub enum ProverError {
    #[error("witness rejected: {0}")]
    Witness(#[from] CircuitError),

    #[error("params I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("KZG params digest mismatch: expected {expected}, got {actual}")]
    ParamsDigest { expected: String, actual: String },

    #[error("KZG params support k={actual}, circuit needs k={expected}")]
    ParamsSize { expected: u32, actual: u32 },

    #[error("invalid circuit config: {0}")]
    Config(String),

    #[error("key generation failed: {0}")]
    Keygen(String),

    #[error("proof generation failed: {0}")]
    Proving(String),

    #[error("proof verification failed: {0}")]
    Verification(String),
}
