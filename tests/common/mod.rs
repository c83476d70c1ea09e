//! Shared fixtures for the ledger integration tests

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use zkvox::{
    zkvox_circuits::NUM_PUBLIC_INPUTS, AccountId, Dao, FnVerifier, Fr, ProtocolConfig,
    SoulboundBadge,
};

pub type StubFn = Box<dyn Fn(&[u8], &[Fr; NUM_PUBLIC_INPUTS]) -> bool + Send + Sync>;
pub type StubVerifier = FnVerifier<StubFn>;

pub fn owner() -> AccountId {
    AccountId::from("deployer")
}

pub fn dao_account() -> AccountId {
    AccountId::from("dao")
}

pub fn badge() -> SoulboundBadge {
    let mut badge = SoulboundBadge::new("Voter Badge", "VOTE", owner());
    badge
        .set_minter(&owner(), dao_account())
        .expect("owner sets minter");
    badge
}

/// Accept-everything verifier that counts how often it was consulted.
pub fn counting_verifier(accept: bool) -> (StubVerifier, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let verifier: StubFn = Box::new(move |_, _| {
        seen.fetch_add(1, Ordering::SeqCst);
        accept
    });
    (FnVerifier(verifier), calls)
}

/// Verifier that accepts exactly one proof/instances pair.
pub fn expecting_verifier(proof: Vec<u8>, instances: [Fr; NUM_PUBLIC_INPUTS]) -> StubVerifier {
    FnVerifier(Box::new(move |p, i| p == proof.as_slice() && *i == instances))
}

pub fn dao_with<V: zkvox::ProofVerifier>(depth: usize, history: usize, verifier: V) -> Dao<V> {
    let config = ProtocolConfig {
        tree_depth: depth,
        root_history_size: history,
        ..Default::default()
    };
    Dao::new(&config, dao_account(), badge(), verifier).expect("valid config")
}
