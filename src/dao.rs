// src/dao.rs
//
// Proposal & tally state machine. Owns the accumulator, the nullifier
// ledger and the proposal records; holds the minting capability for the
// credential registry.

use std::collections::BTreeMap;

use chrono::Utc;
use halo2_base::halo2_proofs::halo2curves::ff::Field;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zkvox_circuits::Fr;

use crate::accumulator::Accumulator;
use crate::config::ProtocolConfig;
use crate::error::{ConfigError, DaoError};
use crate::events::LedgerEvent;
use crate::field::PublicSignals;
use crate::nullifier::NullifierLedger;
use crate::token::{AccountId, SoulboundBadge};
use crate::verifier::ProofVerifier;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub metadata_ref: String,
    pub yes_count: u64,
    pub no_count: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

pub struct Dao<V> {
    account: AccountId,
    accumulator: Accumulator,
    nullifiers: NullifierLedger,
    proposals: BTreeMap<u64, Proposal>,
    badge: SoulboundBadge,
    verifier: V,
    events: Vec<LedgerEvent>,
}

impl<V: ProofVerifier> Dao<V> {
    /// `account` is the ledger's own identity; credentials are minted only
    /// if `badge` names it as minter.
    pub fn new(
        config: &ProtocolConfig,
        account: AccountId,
        badge: SoulboundBadge,
        verifier: V,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(depth) = verifier.tree_depth() {
            if depth != config.tree_depth {
                return Err(ConfigError::Invalid(format!(
                    "verifier is keyed for tree_depth={depth}, ledger uses tree_depth={}",
                    config.tree_depth
                )));
            }
        }
        info!(
            account = %account,
            tree_depth = config.tree_depth,
            root_history_size = config.root_history_size,
            "dao initialized"
        );
        Ok(Self {
            account,
            accumulator: Accumulator::new(config.tree_depth, config.root_history_size),
            nullifiers: NullifierLedger::new(),
            proposals: BTreeMap::new(),
            badge,
            verifier,
            events: Vec::new(),
        })
    }

    /// Add an identity commitment to the membership set.
    ///
    /// The same commitment may be registered more than once; each gets its
    /// own index.
    pub fn register(&mut self, commitment: Fr) -> Result<u64, DaoError> {
        let index = self.accumulator.insert(commitment)?;
        self.events.push(LedgerEvent::MemberAdded {
            index,
            commitment,
            timestamp: Utc::now(),
        });
        Ok(index)
    }

    pub fn create_proposal(
        &mut self,
        id: u64,
        title: impl Into<String>,
        description: impl Into<String>,
        metadata_ref: impl Into<String>,
    ) -> Result<(), DaoError> {
        if self.proposals.contains_key(&id) {
            warn!(id, "proposal already exists");
            return Err(DaoError::DuplicateProposal);
        }
        let title = title.into();
        self.proposals.insert(
            id,
            Proposal {
                id,
                title: title.clone(),
                description: description.into(),
                metadata_ref: metadata_ref.into(),
                yes_count: 0,
                no_count: 0,
            },
        );
        info!(id, "proposal created");
        self.events.push(LedgerEvent::ProposalCreated { id, title });
        Ok(())
    }

    /// Verify and count one anonymous vote, minting a credential to
    /// `beneficiary`.
    ///
    /// Checks run cheapest first and stop at the first failure; nothing is
    /// mutated unless every check passes.
    pub fn submit_vote(
        &mut self,
        proof: &[u8],
        signals: &PublicSignals,
        beneficiary: &AccountId,
    ) -> Result<(), DaoError> {
        let result = self.try_submit_vote(proof, signals, beneficiary);
        if let Err(err) = &result {
            warn!(error = %err, retryable = err.is_retryable(), "vote rejected");
        }
        result
    }

    fn try_submit_vote(
        &mut self,
        proof: &[u8],
        signals: &PublicSignals,
        beneficiary: &AccountId,
    ) -> Result<(), DaoError> {
        // (a) field guard
        let fields = signals.check()?;

        // (b) proposal exists
        let proposal_id = proposal_key(&signals.proposal_id).ok_or(DaoError::ProposalNotFound)?;
        if !self.proposals.contains_key(&proposal_id) {
            return Err(DaoError::ProposalNotFound);
        }

        // (c) nullifier unspent
        if self.nullifiers.is_spent(&fields.nullifier_hash) {
            return Err(DaoError::DoubleVote);
        }

        // (d) root within the history window
        if !self.accumulator.is_known_root(&fields.root) {
            return Err(DaoError::UnknownRoot);
        }

        // (e) proof
        if !self.verifier.verify(proof, &fields.to_instances()) {
            return Err(DaoError::InvalidProof);
        }
        debug!(proposal_id, "vote proof accepted");

        // Commit. Minting is the only step that can still fail, so it goes
        // first; nothing after it may return early.
        let token_id = self.badge.mint(&self.account, beneficiary)?;
        let spent = self.nullifiers.spend(&fields.nullifier_hash);
        // Checked unspent at (c) under the same borrow
        debug_assert!(spent.is_ok(), "nullifier spent between check and commit");

        let yes = fields.vote == Fr::ONE;
        if let Some(proposal) = self.proposals.get_mut(&proposal_id) {
            if yes {
                proposal.yes_count += 1;
            } else {
                proposal.no_count += 1;
            }
        }

        info!(proposal_id, token_id, "vote counted");
        self.events.push(LedgerEvent::VoteCast {
            proposal_id,
            nullifier_hash: fields.nullifier_hash,
            vote: yes,
        });
        self.events.push(LedgerEvent::CredentialMinted {
            token_id,
            holder: beneficiary.clone(),
        });
        Ok(())
    }

    pub fn root(&self) -> Fr {
        self.accumulator.root()
    }

    pub fn is_known_root(&self, root: &Fr) -> bool {
        self.accumulator.is_known_root(root)
    }

    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        self.proposals.get(&id)
    }

    pub fn tally(&self, id: u64) -> Option<Tally> {
        self.proposals.get(&id).map(|p| Tally { yes: p.yes_count, no: p.no_count })
    }

    pub fn account(&self) -> &AccountId {
        &self.account
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn nullifiers(&self) -> &NullifierLedger {
        &self.nullifiers
    }

    pub fn badge(&self) -> &SoulboundBadge {
        &self.badge
    }

    /// Owner-side administration (minter rotation).
    pub fn badge_mut(&mut self) -> &mut SoulboundBadge {
        &mut self.badge
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Hand the accumulated events to an indexer.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Proposal ids are `u64`; a wider (but in-field) id names no proposal.
fn proposal_key(raw: &BigUint) -> Option<u64> {
    u64::try_from(raw).ok()
}
