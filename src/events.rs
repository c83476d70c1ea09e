// src/events.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zkvox_circuits::{utils::serde_hex, Fr};

use crate::token::{AccountId, TokenId};

/// Ledger events in commit order. Failed operations emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    MemberAdded {
        index: u64,
        #[serde(with = "serde_hex")]
        commitment: Fr,
        timestamp: DateTime<Utc>,
    },
    ProposalCreated {
        id: u64,
        title: String,
    },
    VoteCast {
        proposal_id: u64,
        #[serde(with = "serde_hex")]
        nullifier_hash: Fr,
        vote: bool,
    },
    CredentialMinted {
        token_id: TokenId,
        holder: AccountId,
    },
}

/// Ordered leaf list recovered from `MemberAdded` events, the input a
/// prover needs to rebuild its membership tree.
pub fn member_commitments<'a>(events: impl IntoIterator<Item = &'a LedgerEvent>) -> Vec<Fr> {
    let mut members: Vec<(u64, Fr)> = events
        .into_iter()
        .filter_map(|event| match event {
            LedgerEvent::MemberAdded { index, commitment, .. } => Some((*index, *commitment)),
            _ => None,
        })
        .collect();
    members.sort_by_key(|(index, _)| *index);
    members.into_iter().map(|(_, commitment)| commitment).collect()
}
