// src/nullifier.rs

use std::collections::HashSet;

use zkvox_circuits::Fr;

use crate::error::DaoError;

/// Spent nullifiers. A nullifier is `hash(secret, proposalId)`, so one
/// identity may vote on every proposal but only once on each.
#[derive(Clone, Debug, Default)]
pub struct NullifierLedger {
    spent: HashSet<[u8; 32]>,
}

impl NullifierLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spent(&self, nullifier: &Fr) -> bool {
        self.spent.contains(&nullifier.to_bytes())
    }

    /// Mark `nullifier` spent; fails if it already was.
    pub fn spend(&mut self, nullifier: &Fr) -> Result<(), DaoError> {
        if self.spent.insert(nullifier.to_bytes()) {
            Ok(())
        } else {
            Err(DaoError::DoubleVote)
        }
    }

    pub fn len(&self) -> usize {
        self.spent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
