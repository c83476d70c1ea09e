// src/instruction.rs
//
// Relayer-facing calldata and its decoding into a ledger instruction.
// Scalars are carried as 256-bit integers and are NOT reduced modulo the
// field here: the field guard must see exactly what the submitter sent.

use halo2_base::utils::fe_to_biguint;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use zkvox_circuits::{utils::parse_uint, Fr, NUM_PUBLIC_INPUTS};

use crate::error::InstructionError;
use crate::field::{PublicSignals, SignalField};
use crate::token::AccountId;

/// Formatted proof submission, ordered like the ledger's `castVote` entry
/// point: proof, then nullifierHash, proposalId, root, vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCalldata {
    /// `0x`-prefixed hex of the proof transcript
    pub proof: String,
    pub nullifier_hash: String,
    pub proposal_id: String,
    pub root: String,
    pub vote: String,
    pub beneficiary: AccountId,
}

impl VoteCalldata {
    /// Format a proof and its public instances `[root, nullifierHash,
    /// proposalId, vote]` as decimal calldata.
    pub fn from_proof(
        proof: &[u8],
        instances: &[Fr; NUM_PUBLIC_INPUTS],
        beneficiary: AccountId,
    ) -> Self {
        let [root, nullifier_hash, proposal_id, vote] = instances;
        Self {
            proof: format!("0x{}", hex::encode(proof)),
            nullifier_hash: fe_to_biguint(nullifier_hash).to_string(),
            proposal_id: fe_to_biguint(proposal_id).to_string(),
            root: fe_to_biguint(root).to_string(),
            vote: fe_to_biguint(vote).to_string(),
            beneficiary,
        }
    }
}

/// Decoded `submitVote` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteInstruction {
    pub proof: Vec<u8>,
    pub signals: PublicSignals,
    pub beneficiary: AccountId,
}

impl VoteInstruction {
    pub fn unpack(calldata: &VoteCalldata) -> Result<Self, InstructionError> {
        let proof = hex::decode(strip_hex_prefix(&calldata.proof).unwrap_or(&calldata.proof))
            .map_err(|e| InstructionError::Proof(e.to_string()))?;

        Ok(Self {
            proof,
            signals: PublicSignals {
                root: parse_uint256(SignalField::Root, &calldata.root)?,
                nullifier_hash: parse_uint256(SignalField::NullifierHash, &calldata.nullifier_hash)?,
                proposal_id: parse_uint256(SignalField::ProposalId, &calldata.proposal_id)?,
                vote: parse_uint256(SignalField::Vote, &calldata.vote)?,
            },
            beneficiary: calldata.beneficiary.clone(),
        })
    }
}

fn strip_hex_prefix(value: &str) -> Option<&str> {
    value.strip_prefix("0x").or_else(|| value.strip_prefix("0X"))
}

/// Decimal or `0x` hex, at most 256 bits.
fn parse_uint256(field: SignalField, value: &str) -> Result<BigUint, InstructionError> {
    if value.is_empty() {
        return Err(InstructionError::Missing(field));
    }

    let parsed = parse_uint(value).map_err(|_| InstructionError::Malformed {
        field,
        value: value.to_string(),
    })?;
    if parsed.bits() > 256 {
        return Err(InstructionError::TooWide(field));
    }
    Ok(parsed)
}
