// src/error.rs

use thiserror::Error;

use crate::field::SignalField;

/// Protocol-level rejection. Surfaced verbatim to callers; every variant
/// leaves ledger state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DaoError {
    #[error("Input overflow: {0}")]
    Overflow(SignalField),

    #[error("Membership tree is full")]
    CapacityExceeded,

    #[error("Proposal already exists")]
    DuplicateProposal,

    #[error("Proposal does not exist")]
    ProposalNotFound,

    #[error("Security: Double voting detected")]
    DoubleVote,

    #[error("Unknown Merkle root")]
    UnknownRoot,

    #[error("Invalid zero-knowledge proof")]
    InvalidProof,

    #[error("Caller is not authorized")]
    NotAuthorized,

    #[error("Credential is non-transferable")]
    NotTransferable,
}

impl DaoError {
    /// Only a stale root is worth a retry: regenerate the proof against a
    /// currently known root and resubmit. Everything else is permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DaoError::UnknownRoot)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Verifier setup failed: {0}")]
    Prover(#[from] zkvox_circuits::ProverError),
}

/// Malformed relayer calldata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    #[error("Missing value for {0}")]
    Missing(SignalField),

    #[error("Malformed integer for {field}: {value}")]
    Malformed { field: SignalField, value: String },

    #[error("Value for {0} exceeds 256 bits")]
    TooWide(SignalField),

    #[error("Malformed proof hex: {0}")]
    Proof(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error(transparent)]
    Instruction(#[from] InstructionError),

    #[error("Submission rejected: {0}")]
    Rejected(#[from] DaoError),
}

impl RelayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            RelayError::Rejected(err) => err.is_retryable(),
            RelayError::Instruction(_) => false,
        }
    }
}
