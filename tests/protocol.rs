//! Submission pipeline ordering and rejection behavior

mod common;

use std::sync::atomic::Ordering;

use common::{counting_verifier, dao_with};
use num_bigint::BigUint;
use zkvox::{
    zkvox_circuits::halo2_base::halo2_proofs::halo2curves::ff::Field, AccountId, DaoError,
    Fr, PublicSignals, Relayer, SignalField, Tally, VoteCalldata, FIELD_MODULUS,
};

fn signals(root: Fr, nullifier: u64, proposal_id: u64, vote: u64) -> PublicSignals {
    PublicSignals::from_instances(&[root, Fr::from(nullifier), Fr::from(proposal_id), Fr::from(vote)])
}

#[test]
fn test_overflow_rejected_before_anything_else() {
    let (verifier, calls) = counting_verifier(true);
    let mut dao = dao_with(4, 30, verifier);
    dao.create_proposal(1, "t", "d", "m").unwrap();
    dao.register(Fr::from(3)).unwrap();

    let mut s = signals(dao.root(), 5, 1, 1);
    s.nullifier_hash = &*FIELD_MODULUS + 1u32;
    // Everything else about this submission is also wrong
    s.proposal_id = BigUint::from(77u32);
    s.root = BigUint::from(1u32);

    let events_before = dao.events().len();
    assert_eq!(
        dao.submit_vote(b"p", &s, &AccountId::from("x")),
        Err(DaoError::Overflow(SignalField::NullifierHash))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(dao.events().len(), events_before);

    // Exactly p is already out of range
    let mut s = signals(dao.root(), 5, 1, 1);
    s.vote = FIELD_MODULUS.clone();
    assert_eq!(
        dao.submit_vote(b"p", &s, &AccountId::from("x")),
        Err(DaoError::Overflow(SignalField::Vote))
    );
}

#[test]
fn test_double_vote_rejected_regardless_of_proof() {
    let (verifier, calls) = counting_verifier(true);
    let mut dao = dao_with(4, 30, verifier);
    dao.create_proposal(1, "t", "d", "m").unwrap();
    let voter = AccountId::from("v");

    dao.submit_vote(b"p", &signals(dao.root(), 42, 1, 1), &voter).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Different proof bytes, different vote: still the same nullifier
    assert_eq!(
        dao.submit_vote(b"other", &signals(dao.root(), 42, 1, 0), &voter),
        Err(DaoError::DoubleVote)
    );
    // Rejected before verification
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(dao.tally(1), Some(Tally { yes: 1, no: 0 }));
}

#[test]
fn test_unknown_root_is_retryable_and_side_effect_free() {
    let (verifier, calls) = counting_verifier(true);
    let mut dao = dao_with(4, 2, verifier);
    dao.create_proposal(1, "t", "d", "m").unwrap();

    let stale = dao.root();
    dao.register(Fr::from(1)).unwrap();
    // Pre-insertion root still inside the window
    assert!(dao.is_known_root(&stale));
    dao.register(Fr::from(2)).unwrap();
    assert!(!dao.is_known_root(&stale));

    let err = dao
        .submit_vote(b"p", &signals(stale, 9, 1, 1), &AccountId::from("v"))
        .unwrap_err();
    assert_eq!(err, DaoError::UnknownRoot);
    assert!(err.is_retryable());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!dao.nullifiers().is_spent(&Fr::from(9)));

    // Regenerated against the current root, it goes through
    dao.submit_vote(b"p", &signals(dao.root(), 9, 1, 1), &AccountId::from("v")).unwrap();
}

#[test]
fn test_invalid_proof_leaves_state_unchanged() {
    let (verifier, calls) = counting_verifier(false);
    let mut dao = dao_with(4, 30, verifier);
    dao.create_proposal(1, "t", "d", "m").unwrap();
    let voter = AccountId::from("v");

    let err = dao.submit_vote(b"bad", &signals(dao.root(), 1, 1, 1), &voter).unwrap_err();
    assert_eq!(err, DaoError::InvalidProof);
    assert!(!err.is_retryable());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(dao.tally(1), Some(Tally::default()));
    assert!(!dao.nullifiers().is_spent(&Fr::from(1)));
    assert_eq!(dao.badge().total_supply(), 0);
}

#[test]
fn test_missing_proposal_checked_before_nullifier() {
    let (verifier, _) = counting_verifier(true);
    let mut dao = dao_with(4, 30, verifier);
    dao.create_proposal(1, "t", "d", "m").unwrap();
    dao.submit_vote(b"p", &signals(dao.root(), 5, 1, 1), &AccountId::from("v")).unwrap();

    // Spent nullifier, but the proposal check comes first
    assert_eq!(
        dao.submit_vote(b"p", &signals(dao.root(), 5, 2, 1), &AccountId::from("v")),
        Err(DaoError::ProposalNotFound)
    );
}

#[test]
fn test_duplicate_proposal_keeps_tally() {
    let (verifier, _) = counting_verifier(true);
    let mut dao = dao_with(4, 30, verifier);
    dao.create_proposal(1, "first", "d", "m").unwrap();
    dao.submit_vote(b"p", &signals(dao.root(), 5, 1, 0), &AccountId::from("v")).unwrap();

    assert_eq!(dao.create_proposal(1, "again", "d", "m"), Err(DaoError::DuplicateProposal));
    assert_eq!(dao.tally(1), Some(Tally { yes: 0, no: 1 }));
    assert_eq!(dao.proposal(1).unwrap().title, "first");
}

#[test]
fn test_capacity_exceeded() {
    let (verifier, _) = counting_verifier(true);
    let mut dao = dao_with(1, 30, verifier);
    dao.register(Fr::ONE).unwrap();
    dao.register(Fr::ONE).unwrap();
    assert_eq!(dao.register(Fr::from(2)), Err(DaoError::CapacityExceeded));
    assert_eq!(dao.events().len(), 2);
}

#[test]
fn test_relayed_submission_credits_beneficiary() {
    let (verifier, _) = counting_verifier(true);
    let mut self_submitted = dao_with(4, 30, verifier);
    let (verifier, _) = counting_verifier(true);
    let mut relayed = dao_with(4, 30, verifier);
    for dao in [&mut self_submitted, &mut relayed] {
        dao.register(Fr::from(8)).unwrap();
        dao.create_proposal(1, "t", "d", "m").unwrap();
    }

    let prover = AccountId::from("prover");
    let instances = [relayed.root(), Fr::from(31), Fr::from(1), Fr::ONE];

    self_submitted
        .submit_vote(b"proof", &PublicSignals::from_instances(&instances), &prover)
        .unwrap();

    let calldata = VoteCalldata::from_proof(b"proof", &instances, prover.clone());
    Relayer::new(AccountId::from("relayer.near")).relay(&mut relayed, &calldata).unwrap();

    for dao in [&self_submitted, &relayed] {
        assert_eq!(dao.tally(1), Some(Tally { yes: 1, no: 0 }));
        assert_eq!(dao.badge().balance_of(&prover), 1);
    }
    assert_eq!(relayed.badge().balance_of(&AccountId::from("relayer.near")), 0);
}

#[test]
fn test_relayer_surfaces_errors_verbatim() {
    let (verifier, _) = counting_verifier(true);
    let mut dao = dao_with(4, 30, verifier);
    let relayer = Relayer::new(AccountId::from("relayer"));

    let mut calldata =
        VoteCalldata::from_proof(b"p", &[dao.root(), Fr::from(1), Fr::from(1), Fr::ONE], "a".into());
    let err = relayer.relay(&mut dao, &calldata).unwrap_err();
    assert_eq!(err, zkvox::RelayError::Rejected(DaoError::ProposalNotFound));

    calldata.root = "not-a-number".into();
    assert!(matches!(
        relayer.relay(&mut dao, &calldata),
        Err(zkvox::RelayError::Instruction(_))
    ));
}

#[test]
fn test_root_depends_only_on_commitment_sequence() {
    let commitments: Vec<Fr> = [5u64, 5, 9, 0, 12].into_iter().map(Fr::from).collect();

    let (verifier, _) = counting_verifier(true);
    let mut a = dao_with(6, 30, verifier);
    let (verifier, _) = counting_verifier(true);
    let mut b = dao_with(6, 30, verifier);

    for (i, c) in commitments.iter().enumerate() {
        assert_eq!(a.register(*c).unwrap(), i as u64);
    }
    // Interleave unrelated activity on the second ledger
    for (i, c) in commitments.iter().enumerate() {
        b.create_proposal(i as u64, "noise", "", "").unwrap();
        b.register(*c).unwrap();
    }
    assert_eq!(a.root(), b.root());

    // Duplicate commitment took two slots
    assert_eq!(zkvox::member_commitments(a.events()), commitments);
    assert_eq!(a.accumulator().len(), 5);
}
