// src/field.rs
//
// Field Arithmetic Guard. Public signals arrive as unreduced 256-bit
// integers; anything >= p would alias to another field element inside the
// proof system, so it is rejected before any comparison or hash.

use std::fmt;

use halo2_base::utils::{biguint_to_fe, fe_to_biguint};
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use zkvox_circuits::{Fr, NUM_PUBLIC_INPUTS};

use crate::error::DaoError;

/// BN254 scalar field order, decimal.
pub const BN254_MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

const MODULUS_BE: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

pub static FIELD_MODULUS: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&MODULUS_BE));

/// Names of the public signals, in instance order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalField {
    Root,
    NullifierHash,
    ProposalId,
    Vote,
}

impl fmt::Display for SignalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalField::Root => "root",
            SignalField::NullifierHash => "nullifierHash",
            SignalField::ProposalId => "proposalId",
            SignalField::Vote => "vote",
        };
        f.write_str(name)
    }
}

/// Reject `value >= p`; otherwise return it as a field element.
pub fn guard(field: SignalField, value: &BigUint) -> Result<Fr, DaoError> {
    if value >= &*FIELD_MODULUS {
        return Err(DaoError::Overflow(field));
    }
    Ok(biguint_to_fe(value))
}

/// Public signals exactly as submitted, not yet reduced or checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicSignals {
    pub root: BigUint,
    pub nullifier_hash: BigUint,
    pub proposal_id: BigUint,
    pub vote: BigUint,
}

/// Public signals that passed the guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSignals {
    pub root: Fr,
    pub nullifier_hash: Fr,
    pub proposal_id: Fr,
    pub vote: Fr,
}

impl PublicSignals {
    /// From circuit instances `[root, nullifierHash, proposalId, vote]`.
    pub fn from_instances(instances: &[Fr; NUM_PUBLIC_INPUTS]) -> Self {
        let [root, nullifier_hash, proposal_id, vote] = instances;
        Self {
            root: fe_to_biguint(root),
            nullifier_hash: fe_to_biguint(nullifier_hash),
            proposal_id: fe_to_biguint(proposal_id),
            vote: fe_to_biguint(vote),
        }
    }

    /// Guard every signal, in instance order; the first overflow wins.
    pub fn check(&self) -> Result<FieldSignals, DaoError> {
        Ok(FieldSignals {
            root: guard(SignalField::Root, &self.root)?,
            nullifier_hash: guard(SignalField::NullifierHash, &self.nullifier_hash)?,
            proposal_id: guard(SignalField::ProposalId, &self.proposal_id)?,
            vote: guard(SignalField::Vote, &self.vote)?,
        })
    }
}

impl FieldSignals {
    pub fn to_instances(&self) -> [Fr; NUM_PUBLIC_INPUTS] {
        [self.root, self.nullifier_hash, self.proposal_id, self.vote]
    }
}
