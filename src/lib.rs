// src/lib.rs
//
// zkvox: one member, one anonymous vote per proposal.
//
// Members register identity commitments into a Poseidon Merkle accumulator.
// A vote carries a halo2 proof of membership plus a per-proposal nullifier;
// the ledger range-checks the public signals, rejects replayed nullifiers
// and stale roots, verifies the proof, tallies, and mints a soulbound
// credential to the voter's chosen beneficiary.

pub mod accumulator;
pub mod config;
pub mod dao;
pub mod error;
pub mod events;
pub mod field;
pub mod instruction;
pub mod nullifier;
pub mod relayer;
pub mod root_history;
pub mod shared;
pub mod token;
pub mod verifier;

pub use accumulator::Accumulator;
pub use config::ProtocolConfig;
pub use dao::{Dao, Proposal, Tally};
pub use error::{ConfigError, DaoError, InstructionError, RelayError};
pub use events::{member_commitments, LedgerEvent};
pub use field::{guard, PublicSignals, SignalField, FIELD_MODULUS};
pub use instruction::{VoteCalldata, VoteInstruction};
pub use nullifier::NullifierLedger;
pub use relayer::Relayer;
pub use shared::SharedDao;
pub use token::{AccountId, SoulboundBadge, TokenId};
pub use verifier::{FnVerifier, Halo2Verifier, ProofVerifier};

pub use zkvox_circuits;
pub use zkvox_circuits::Fr;
