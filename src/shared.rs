// src/shared.rs

use std::sync::Arc;

use parking_lot::Mutex;
use zkvox_circuits::Fr;

use crate::dao::{Dao, Proposal, Tally};
use crate::error::DaoError;
use crate::field::PublicSignals;
use crate::token::AccountId;
use crate::verifier::ProofVerifier;

/// Single-writer host for a `Dao`: every operation takes the lock for its
/// whole duration, so concurrent submissions are applied one at a time.
pub struct SharedDao<V> {
    inner: Arc<Mutex<Dao<V>>>,
}

impl<V> Clone for SharedDao<V> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<V: ProofVerifier> SharedDao<V> {
    pub fn new(dao: Dao<V>) -> Self {
        Self { inner: Arc::new(Mutex::new(dao)) }
    }

    pub fn register(&self, commitment: Fr) -> Result<u64, DaoError> {
        self.inner.lock().register(commitment)
    }

    pub fn create_proposal(
        &self,
        id: u64,
        title: &str,
        description: &str,
        metadata_ref: &str,
    ) -> Result<(), DaoError> {
        self.inner.lock().create_proposal(id, title, description, metadata_ref)
    }

    pub fn submit_vote(
        &self,
        proof: &[u8],
        signals: &PublicSignals,
        beneficiary: &AccountId,
    ) -> Result<(), DaoError> {
        self.inner.lock().submit_vote(proof, signals, beneficiary)
    }

    pub fn root(&self) -> Fr {
        self.inner.lock().root()
    }

    pub fn is_known_root(&self, root: &Fr) -> bool {
        self.inner.lock().is_known_root(root)
    }

    pub fn tally(&self, id: u64) -> Option<Tally> {
        self.inner.lock().tally(id)
    }

    /// Snapshot of proposal `id`.
    pub fn proposal(&self, id: u64) -> Option<Proposal> {
        self.inner.lock().proposal(id).cloned()
    }

    /// Run `f` with exclusive access to the ledger.
    pub fn with<R>(&self, f: impl FnOnce(&mut Dao<V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProtocolConfig;
    use crate::token::SoulboundBadge;
    use crate::verifier::FnVerifier;
    use zkvox_circuits::NUM_PUBLIC_INPUTS;

    fn accept(_: &[u8], _: &[Fr; NUM_PUBLIC_INPUTS]) -> bool {
        true
    }

    type Stub = FnVerifier<fn(&[u8], &[Fr; NUM_PUBLIC_INPUTS]) -> bool>;

    fn shared() -> SharedDao<Stub> {
        let config = ProtocolConfig { tree_depth: 4, ..Default::default() };
        let owner = AccountId::from("deployer");
        let mut badge = SoulboundBadge::new("Voter Badge", "VOTE", owner.clone());
        badge.set_minter(&owner, AccountId::from("dao")).unwrap();
        let dao = Dao::new(&config, AccountId::from("dao"), badge, FnVerifier(accept as _)).unwrap();
        SharedDao::new(dao)
    }

    #[test]
    fn test_proposal_snapshot() {
        let shared = shared();
        assert_eq!(shared.proposal(3), None);

        shared.create_proposal(3, "Budget", "Q3 budget", "ipfs://b").unwrap();
        let before = shared.proposal(3).unwrap();
        assert_eq!(before.title, "Budget");
        assert_eq!(before.metadata_ref, "ipfs://b");

        let signals = PublicSignals::from_instances(&[
            shared.root(),
            Fr::from(21),
            Fr::from(3),
            Fr::from(0),
        ]);
        shared.submit_vote(b"p", &signals, &AccountId::from("v")).unwrap();

        // Earlier snapshots are not live views
        assert_eq!(before.no_count, 0);
        assert_eq!(shared.proposal(3).unwrap().no_count, 1);
    }
}
