// Poseidon Hash using Axiom halo2_base
// Production-proven: Axiom Mainnet V2, Trail of Bits audited (2023)
// Reference: https://github.com/axiom-crypto/halo2-lib
//
// The same gadget backs both the vote circuit and every native hash the
// ledger computes (accumulator nodes, commitments, nullifiers). Native values
// are read back from a witness-generation context, so the two sides cannot
// drift apart.

use halo2_base::{
    gates::GateInstructions,
    poseidon::hasher::{PoseidonHasher, spec::OptimizedPoseidonSpec},
    AssignedValue, Context,
    utils::BigPrimeField,
};

// Poseidon parameters (aligned with Axiom standard)
pub const T: usize = 3;      // State size
pub const RATE: usize = 2;   // Absorption rate (inputs per permutation)
pub const R_F: usize = 8;    // Full rounds
pub const R_P: usize = 57;   // Partial rounds (Axiom standard)

/// Create a Poseidon hasher with its round constants loaded into `ctx`.
///
/// Create it ONCE per circuit and pass it to the `*_with_hasher` helpers;
/// loading constants costs ~1400 advice cells per initialization.
pub fn create_poseidon_hasher<F: BigPrimeField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
) -> PoseidonHasher<F, T, RATE> {
    let mut hasher = PoseidonHasher::<F, T, RATE>::new(
        OptimizedPoseidonSpec::new::<R_F, R_P, 0>()
    );
    hasher.initialize_consts(ctx, gate);
    hasher
}

/// Hash two field elements: Merkle internal nodes and nullifiers
///
/// Domain: ConstantLength<2> equivalent (determined by array length)
/// Non-commutative: hash(a,b) ≠ hash(b,a)
pub fn hash_pair_with_hasher<F: BigPrimeField>(
    hasher: &PoseidonHasher<F, T, RATE>,
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    left: AssignedValue<F>,
    right: AssignedValue<F>,
) -> AssignedValue<F> {
    hasher.hash_fix_len_array(ctx, gate, &[left, right])
}

/// Hash a single field element: identity commitments
///
/// Domain separated from pair hashing by input length.
pub fn hash_single_with_hasher<F: BigPrimeField>(
    hasher: &PoseidonHasher<F, T, RATE>,
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    value: AssignedValue<F>,
) -> AssignedValue<F> {
    hasher.hash_fix_len_array(ctx, gate, &[value])
}

/// One-shot pair hash (initializes its own hasher).
pub fn hash_pair<F: BigPrimeField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    left: AssignedValue<F>,
    right: AssignedValue<F>,
) -> AssignedValue<F> {
    let hasher = create_poseidon_hasher(ctx, gate);
    hash_pair_with_hasher(&hasher, ctx, gate, left, right)
}

/// One-shot single hash (initializes its own hasher).
pub fn hash_single<F: BigPrimeField>(
    ctx: &mut Context<F>,
    gate: &impl GateInstructions<F>,
    value: AssignedValue<F>,
) -> AssignedValue<F> {
    let hasher = create_poseidon_hasher(ctx, gate);
    hash_single_with_hasher(&hasher, ctx, gate, value)
}

/// Out-of-circuit evaluation of the Poseidon gadget.
pub mod native {
    use super::{create_poseidon_hasher, hash_pair_with_hasher, hash_single_with_hasher, RATE, T};
    use halo2_base::{
        gates::{
            circuit::{builder::RangeCircuitBuilder, CircuitBuilderStage},
            RangeChip, RangeInstructions,
        },
        halo2_proofs::halo2curves::bn256::Fr,
        poseidon::hasher::PoseidonHasher,
    };

    /// Row budget of the scratch builder; never synthesized, only sized.
    const SCRATCH_K: usize = 10;

    /// Reusable native hasher.
    ///
    /// Every hash appends cells to a private scratch context, so keep one
    /// instance per logical operation (one accumulator insertion, one
    /// witness) and drop it afterwards. The scratch builder is never
    /// synthesized; dropping clears it so halo2-base does not report
    /// unassigned copy constraints or lookups.
    pub struct NativePoseidon {
        builder: RangeCircuitBuilder<Fr>,
        range: RangeChip<Fr>,
        hasher: PoseidonHasher<Fr, T, RATE>,
    }

    impl NativePoseidon {
        pub fn new() -> Self {
            let mut builder: RangeCircuitBuilder<Fr> =
                RangeCircuitBuilder::from_stage(CircuitBuilderStage::Mock).use_k(SCRATCH_K);
            builder.set_lookup_bits(8);
            let range = builder.range_chip();
            let hasher = create_poseidon_hasher(builder.main(0), range.gate());
            Self { builder, range, hasher }
        }

        /// `hash(value)`
        pub fn hash_single(&mut self, value: Fr) -> Fr {
            let ctx = self.builder.main(0);
            let value = ctx.load_witness(value);
            *hash_single_with_hasher(&self.hasher, ctx, self.range.gate(), value).value()
        }

        /// `hash(left, right)`
        pub fn hash_pair(&mut self, left: Fr, right: Fr) -> Fr {
            let ctx = self.builder.main(0);
            let left = ctx.load_witness(left);
            let right = ctx.load_witness(right);
            *hash_pair_with_hasher(&self.hasher, ctx, self.range.gate(), left, right).value()
        }
    }

    impl Drop for NativePoseidon {
        fn drop(&mut self) {
            self.builder.clear();
        }
    }

    impl Default for NativePoseidon {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Identity commitment: `hash(secret)`.
    pub fn commitment(secret: Fr) -> Fr {
        NativePoseidon::new().hash_single(secret)
    }

    /// Per-proposal nullifier: `hash(secret, proposal_id)`.
    pub fn nullifier(secret: Fr, proposal_id: Fr) -> Fr {
        NativePoseidon::new().hash_pair(secret, proposal_id)
    }

    pub fn hash_single(value: Fr) -> Fr {
        NativePoseidon::new().hash_single(value)
    }

    pub fn hash_pair(left: Fr, right: Fr) -> Fr {
        NativePoseidon::new().hash_pair(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo2_base::{
        halo2_proofs::halo2curves::bn256::Fr,
        halo2_proofs::halo2curves::ff::Field,
        gates::{
            circuit::{CircuitBuilderStage, builder::RangeCircuitBuilder},
            RangeInstructions,
        },
    };

    const K: usize = 11; // 2048 rows, sufficient for Poseidon tests

    fn circuit_hash_pair(left: Fr, right: Fr) -> Fr {
        let mut builder: RangeCircuitBuilder<Fr> =
            RangeCircuitBuilder::from_stage(CircuitBuilderStage::Mock).use_k(K);
        builder.set_lookup_bits(8);
        let range = builder.range_chip();
        let gate = range.gate();
        let ctx = builder.main(0);

        let left_assigned = ctx.load_witness(left);
        let right_assigned = ctx.load_witness(right);

        *hash_pair(ctx, gate, left_assigned, right_assigned).value()
    }

    fn circuit_hash_single(value: Fr) -> Fr {
        let mut builder: RangeCircuitBuilder<Fr> =
            RangeCircuitBuilder::from_stage(CircuitBuilderStage::Mock).use_k(K);
        builder.set_lookup_bits(8);
        let range = builder.range_chip();
        let gate = range.gate();
        let ctx = builder.main(0);

        let value_assigned = ctx.load_witness(value);

        *hash_single(ctx, gate, value_assigned).value()
    }

    #[test]
    fn test_native_matches_circuit() {
        let (a, b) = (Fr::from(12345), Fr::from(67890));
        assert_eq!(native::hash_pair(a, b), circuit_hash_pair(a, b));
        assert_eq!(native::hash_single(a), circuit_hash_single(a));
    }

    #[test]
    fn test_reused_native_hasher_is_stable() {
        let mut hasher = native::NativePoseidon::new();
        let first = hasher.hash_pair(Fr::from(1), Fr::from(2));
        let _ = hasher.hash_single(Fr::from(3));
        let again = hasher.hash_pair(Fr::from(1), Fr::from(2));
        assert_eq!(first, again);
        assert_eq!(first, native::hash_pair(Fr::from(1), Fr::from(2)));
    }

    #[test]
    fn test_dropping_used_hashers() {
        // One hasher per accumulator insertion: filled with a full path of
        // hashes, then dropped without synthesis
        let expected = native::hash_pair(Fr::from(8), Fr::from(9));
        for _ in 0..4 {
            let mut hasher = native::NativePoseidon::new();
            let mut current = Fr::from(8);
            for level in 0..20 {
                current = hasher.hash_pair(current, Fr::from(level));
            }
            assert_eq!(hasher.hash_pair(Fr::from(8), Fr::from(9)), expected);
            drop(hasher);
        }
    }

    #[test]
    fn test_hash_pair_noncommutative() {
        // Merkle sibling order must matter
        let a = Fr::from(12345);
        let b = Fr::from(67890);
        assert_ne!(native::hash_pair(a, b), native::hash_pair(b, a));
    }

    #[test]
    fn test_single_and_pair_domains_differ() {
        // hash(x) must not collide with hash(x, 0)
        let x = Fr::from(1337);
        assert_ne!(native::hash_single(x), native::hash_pair(x, Fr::ZERO));
    }

    #[test]
    fn test_zero_inputs_nonzero() {
        assert_ne!(native::hash_single(Fr::ZERO), Fr::ZERO);
        assert_ne!(native::hash_pair(Fr::ZERO, Fr::ZERO), Fr::ZERO);
    }

    #[test]
    fn test_nullifier_scoped_per_proposal() {
        let secret = Fr::from(1337);
        assert_ne!(
            native::nullifier(secret, Fr::from(1)),
            native::nullifier(secret, Fr::from(2))
        );
        assert_eq!(
            native::nullifier(secret, Fr::from(1)),
            native::hash_pair(secret, Fr::from(1))
        );
    }
}
