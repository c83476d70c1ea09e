// Merkle Path Verification using Axiom halo2_base
// Binary Poseidon tree, path directions supplied as witnessed bits.

use halo2_base::{
    gates::GateInstructions,
    halo2_proofs::halo2curves::{bn256::Fr, ff::Field},
    poseidon::hasher::PoseidonHasher,
    utils::BigPrimeField,
    AssignedValue, Context,
};
use crate::error::CircuitError;
use crate::poseidon_hash::{create_poseidon_hasher, hash_pair_with_hasher, native::NativePoseidon, RATE, T};

// ============================================================================
// INPUT VALIDATION
// ============================================================================

/// Validate Merkle path inputs BEFORE entering circuit
///
/// Circuit functions cannot return errors, so malformed requests must be
/// rejected here. Call this before `verify_merkle_path_with_hasher()`:
/// ```ignore
/// validate_merkle_inputs(path.len(), indices.len(), tree_depth)?;
/// let root = verify_merkle_path_with_hasher(&hasher, ctx, gate, leaf, &path, &indices);
/// ```
pub fn validate_merkle_inputs(
    path_len: usize,
    indices_len: usize,
    tree_depth: usize,
) -> Result<(), CircuitError> {
    if path_len != tree_depth {
        return Err(CircuitError::PathLength { got: path_len, expected: tree_depth });
    }
    if indices_len != tree_depth {
        return Err(CircuitError::PathLength { got: indices_len, expected: tree_depth });
    }
    Ok(())
}

/// Constrain `bit` to {0, 1} via bit * bit == bit.
///
/// Equivalent to bit * (bit - 1) == 0.
pub fn constrain_bit<F: BigPrimeField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    bit: AssignedValue<F>,
) {
    let bit_squared = gate.mul(ctx, bit, bit);
    ctx.constrain_equal(&bit, &bit_squared);
}

/// Verify Merkle path using a reusable hasher
///
/// At level `i`, `path_indices[i] == 0` means the running node is the left
/// child: `hash(current, sibling)`; `1` means `hash(sibling, current)`.
/// Each index is constrained boolean, so a prover cannot blend the two
/// orderings. One hash per level.
///
/// `path` and `path_indices` must have equal length (see
/// `validate_merkle_inputs`); extra entries in either are ignored.
///
/// # Returns
/// Computed Merkle root
pub fn verify_merkle_path_with_hasher<F: BigPrimeField>(
    hasher: &PoseidonHasher<F, T, RATE>,
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    leaf: AssignedValue<F>,
    path: &[AssignedValue<F>],
    path_indices: &[AssignedValue<F>],
) -> AssignedValue<F> {
    let mut current = leaf;

    for (sibling, bit) in path.iter().zip(path_indices.iter()) {
        constrain_bit(ctx, gate, *bit);

        // select(a, b, cond) returns: cond ? a : b
        let left = gate.select(ctx, *sibling, current, *bit);
        let right = gate.select(ctx, current, *sibling, *bit);

        current = hash_pair_with_hasher(hasher, ctx, gate, left, right);
    }

    current
}

/// Verify Merkle path with a fresh hasher.
///
/// Prefer `verify_merkle_path_with_hasher` inside larger circuits; every
/// call here reloads the Poseidon constants.
pub fn verify_merkle_path<F: BigPrimeField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    leaf: AssignedValue<F>,
    path: &[AssignedValue<F>],
    path_indices: &[AssignedValue<F>],
) -> AssignedValue<F> {
    let hasher = create_poseidon_hasher(ctx, gate);
    verify_merkle_path_with_hasher(&hasher, ctx, gate, leaf, path, path_indices)
}

/// Native counterpart of `verify_merkle_path_with_hasher`.
///
/// Fails on the first index that is not 0 or 1 instead of silently
/// computing with it.
pub fn compute_root_native(
    hasher: &mut NativePoseidon,
    leaf: Fr,
    path: &[Fr],
    path_indices: &[Fr],
) -> Result<Fr, CircuitError> {
    validate_merkle_inputs(path.len(), path_indices.len(), path.len())?;

    let mut current = leaf;
    for (level, (sibling, bit)) in path.iter().zip(path_indices).enumerate() {
        current = if *bit == Fr::ZERO {
            hasher.hash_pair(current, *sibling)
        } else if *bit == Fr::ONE {
            hasher.hash_pair(*sibling, current)
        } else {
            return Err(CircuitError::PathIndexNotBinary { level });
        };
    }
    Ok(current)
}
