// Anonymous Vote Circuit
//
// Proves, without revealing `secret` or the leaf position:
//   1. commitment = Poseidon(secret)
//   2. commitment is a leaf of the membership tree with the public root
//   3. nullifierHash = Poseidon(secret, proposalId)
//   4. vote ∈ {0, 1}
//
// PUBLIC INSTANCES (single column, this order):
//   [root, nullifierHash, proposalId, vote]
//
// The root and nullifier are COMPUTED in-circuit and exposed directly. The
// verifier supplies the claimed values as instances, so the instance copy
// constraint is the equality check: a tampered path or wrong secret yields
// a different computed value and verification fails.

use halo2_base::{
    gates::{
        circuit::builder::RangeCircuitBuilder,
        GateInstructions, RangeInstructions,
    },
    halo2_proofs::halo2curves::{bn256::Fr, ff::Field},
    AssignedValue, Context,
};

use crate::error::CircuitError;
use crate::merkle::{compute_root_native, constrain_bit, validate_merkle_inputs, verify_merkle_path_with_hasher};
use crate::poseidon_hash::{
    create_poseidon_hasher, hash_pair_with_hasher, hash_single_with_hasher, native::NativePoseidon,
};
use crate::tree::MembershipTree;

/// Number of public instances exposed by the vote circuit.
pub const NUM_PUBLIC_INPUTS: usize = 4;

/// Private and public inputs of one vote proof.
///
/// `path_indices` and `vote` are kept as field elements so that invalid
/// witnesses (non-binary values) can be expressed and rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteWitness {
    // Private
    pub secret: Fr,
    pub path_elements: Vec<Fr>,
    pub path_indices: Vec<Fr>,

    // Public
    pub root: Fr,
    pub nullifier_hash: Fr,
    pub proposal_id: Fr,
    pub vote: Fr,
}

impl VoteWitness {
    /// Witness for the member at `index` of `tree`, voting against its
    /// current root.
    pub fn build(
        tree: &MembershipTree,
        index: u64,
        secret: Fr,
        proposal_id: Fr,
        vote: bool,
    ) -> Result<Self, CircuitError> {
        let path = tree.path(index)?;
        let mut hasher = NativePoseidon::new();
        Ok(Self {
            secret,
            path_elements: path.elements,
            path_indices: path.indices,
            root: tree.root(),
            nullifier_hash: hasher.hash_pair(secret, proposal_id),
            proposal_id,
            vote: Fr::from(vote as u64),
        })
    }

    /// All-zero witness of the right shape, for key generation.
    pub fn dummy(depth: usize) -> Self {
        Self {
            secret: Fr::ZERO,
            path_elements: vec![Fr::ZERO; depth],
            path_indices: vec![Fr::ZERO; depth],
            root: Fr::ZERO,
            nullifier_hash: Fr::ZERO,
            proposal_id: Fr::ZERO,
            vote: Fr::ZERO,
        }
    }

    /// `[root, nullifierHash, proposalId, vote]`
    pub fn public_inputs(&self) -> [Fr; NUM_PUBLIC_INPUTS] {
        [self.root, self.nullifier_hash, self.proposal_id, self.vote]
    }

    /// Evaluate the relation natively, reporting the first violated step.
    pub fn check(&self, depth: usize) -> Result<(), CircuitError> {
        validate_merkle_inputs(self.path_elements.len(), self.path_indices.len(), depth)?;

        let mut hasher = NativePoseidon::new();
        let commitment = hasher.hash_single(self.secret);
        let root = compute_root_native(&mut hasher, commitment, &self.path_elements, &self.path_indices)?;
        if root != self.root {
            return Err(CircuitError::RootMismatch);
        }
        if hasher.hash_pair(self.secret, self.proposal_id) != self.nullifier_hash {
            return Err(CircuitError::NullifierMismatch);
        }
        if self.vote != Fr::ZERO && self.vote != Fr::ONE {
            return Err(CircuitError::VoteNotBoolean);
        }
        Ok(())
    }

    /// Lay out the vote relation in `ctx`.
    ///
    /// Lengths are not checked here; see `assign_vote_circuit`.
    ///
    /// # Returns
    /// `[computed_root, computed_nullifier, proposal_id, vote]`
    pub fn synthesize(
        &self,
        ctx: &mut Context<Fr>,
        gate: &impl GateInstructions<Fr>,
    ) -> [AssignedValue<Fr>; NUM_PUBLIC_INPUTS] {
        // One hasher for all D + 2 hashes
        let hasher = create_poseidon_hasher(ctx, gate);

        let secret = ctx.load_witness(self.secret);
        let commitment = hash_single_with_hasher(&hasher, ctx, gate, secret);

        let path: Vec<_> = self.path_elements.iter().map(|&h| ctx.load_witness(h)).collect();
        let indices: Vec<_> = self.path_indices.iter().map(|&b| ctx.load_witness(b)).collect();
        let root = verify_merkle_path_with_hasher(&hasher, ctx, gate, commitment, &path, &indices);

        let proposal_id = ctx.load_witness(self.proposal_id);
        let nullifier = hash_pair_with_hasher(&hasher, ctx, gate, secret, proposal_id);

        // vote * (vote - 1) == 0
        let vote = ctx.load_witness(self.vote);
        constrain_bit(ctx, gate, vote);

        [root, nullifier, proposal_id, vote]
    }
}

/// Populate `builder` with the vote circuit for `witness` and register its
/// public instances.
///
/// The builder must have lookup bits and one instance column configured.
/// Returns the instance values the circuit actually computed.
pub fn assign_vote_circuit(
    builder: &mut RangeCircuitBuilder<Fr>,
    witness: &VoteWitness,
    depth: usize,
) -> Result<Vec<Fr>, CircuitError> {
    validate_merkle_inputs(witness.path_elements.len(), witness.path_indices.len(), depth)?;

    let range = builder.range_chip();
    let gate = range.gate();
    let ctx = builder.main(0);
    let outputs = witness.synthesize(ctx, gate);

    builder.assigned_instances.clear();
    builder.assigned_instances.push(outputs.to_vec());

    Ok(outputs.iter().map(|v| *v.value()).collect())
}
