// Halo2 KZG Proof Generation and Verification for the vote circuit
//
// SHPLONK multi-open + Blake2b transcript, one instance column with
// [root, nullifierHash, proposalId, vote].

use std::time::Instant;

use halo2_base::{
    gates::circuit::{builder::RangeCircuitBuilder, BaseCircuitParams, CircuitBuilderStage},
    halo2_proofs::{
        dev::MockProver,
        halo2curves::bn256::{Bn256, Fr, G1Affine},
        plonk::{create_proof, keygen_pk, keygen_vk, verify_proof, ProvingKey, VerifyingKey},
        poly::{
            commitment::ParamsProver,
            kzg::{
                commitment::{KZGCommitmentScheme, ParamsKZG},
                multiopen::{ProverSHPLONK, VerifierSHPLONK},
                strategy::SingleStrategy,
            },
        },
        transcript::{
            Blake2bRead, Blake2bWrite, Challenge255, TranscriptReadBuffer, TranscriptWriterBuffer,
        },
    },
};
use rand::rngs::OsRng;
use tracing::{debug, info};

use crate::error::ProverError;
use crate::params::CircuitConfig;
use crate::vote::{assign_vote_circuit, VoteWitness, NUM_PUBLIC_INPUTS};

/// Blinding rows reserved at the bottom of each column
const MIN_ROWS: usize = 9;

/// Halo2 prover/verifier pair for a fixed tree depth.
///
/// Keys are generated once in `setup`; proving reuses the recorded circuit
/// shape (config params + break points).
pub struct VoteProver {
    depth: usize,
    k: u32,
    params: ParamsKZG<Bn256>,
    pk: ProvingKey<G1Affine>,
    vk: VerifyingKey<G1Affine>,
    config_params: BaseCircuitParams,
    break_points: Vec<Vec<usize>>,
}

impl VoteProver {
    /// Load (or generate) params per `config` and run keygen.
    pub fn setup(depth: usize, config: &CircuitConfig) -> Result<Self, ProverError> {
        config.validate()?;
        let params = config.load_params()?;
        Self::setup_with_params(depth, config, params)
    }

    /// Run keygen against already loaded params.
    pub fn setup_with_params(
        depth: usize,
        config: &CircuitConfig,
        params: ParamsKZG<Bn256>,
    ) -> Result<Self, ProverError> {
        config.validate()?;
        let started = Instant::now();
        let k = config.k;

        // Keygen stage determines the circuit shape
        let mut builder = new_builder(CircuitBuilderStage::Keygen, config);
        assign_vote_circuit(&mut builder, &VoteWitness::dummy(depth), depth)?;
        let config_params = builder.calculate_params(Some(MIN_ROWS));

        let vk = keygen_vk(&params, &builder)
            .map_err(|e| ProverError::Keygen(format!("verification key: {:?}", e)))?;
        let pk = keygen_pk(&params, vk.clone(), &builder)
            .map_err(|e| ProverError::Keygen(format!("proving key: {:?}", e)))?;
        let break_points = builder.break_points();

        info!(
            depth,
            k,
            advice_columns = config_params.num_advice_per_phase.iter().sum::<usize>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vote circuit keys generated"
        );

        Ok(Self { depth, k, params, pk, vk, config_params, break_points })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn circuit_size(&self) -> u32 {
        self.k
    }

    /// Generate a proof. Invalid witnesses are refused before proving.
    pub fn prove(&self, witness: &VoteWitness) -> Result<Vec<u8>, ProverError> {
        witness.check(self.depth)?;
        let started = Instant::now();

        // Prover stage: witness generation only, shape from keygen
        let mut builder =
            RangeCircuitBuilder::prover(self.config_params.clone(), self.break_points.clone());
        let public_instances = assign_vote_circuit(&mut builder, witness, self.depth)?;

        let mut transcript = Blake2bWrite::<_, _, Challenge255<_>>::init(vec![]);
        create_proof::<
            KZGCommitmentScheme<Bn256>,
            ProverSHPLONK<'_, Bn256>,
            Challenge255<_>,
            _,
            Blake2bWrite<Vec<u8>, G1Affine, _>,
            _,
        >(
            &self.params,
            &self.pk,
            &[builder],
            &[&[&public_instances]],
            OsRng,
            &mut transcript,
        )
        .map_err(|e| ProverError::Proving(format!("{:?}", e)))?;

        let proof = transcript.finalize();
        info!(
            bytes = proof.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vote proof generated"
        );
        Ok(proof)
    }

    /// Verify `proof` against `[root, nullifierHash, proposalId, vote]`.
    pub fn verify(
        &self,
        proof: &[u8],
        public_inputs: &[Fr; NUM_PUBLIC_INPUTS],
    ) -> Result<(), ProverError> {
        let verifier_params = self.params.verifier_params();
        let strategy = SingleStrategy::new(&self.params);
        let mut transcript = Blake2bRead::<_, _, Challenge255<_>>::init(proof);

        verify_proof::<
            KZGCommitmentScheme<Bn256>,
            VerifierSHPLONK<'_, Bn256>,
            Challenge255<G1Affine>,
            Blake2bRead<&[u8], G1Affine, Challenge255<G1Affine>>,
            SingleStrategy<'_, Bn256>,
        >(
            verifier_params,
            &self.vk,
            strategy,
            &[&[public_inputs.as_slice()]],
            &mut transcript,
        )
        .map_err(|e| ProverError::Verification(format!("{:?}", e)))?;

        debug!("vote proof verified");
        Ok(())
    }
}

fn new_builder(stage: CircuitBuilderStage, config: &CircuitConfig) -> RangeCircuitBuilder<Fr> {
    let mut builder = RangeCircuitBuilder::from_stage(stage).use_k(config.k as usize);
    builder.set_lookup_bits(config.lookup_bits);
    builder.set_instance_columns(1);
    builder
}

/// Check every constraint of the vote circuit with halo2's `MockProver`.
///
/// Unlike `VoteProver::prove`, this skips the native pre-check, so it shows
/// what the constraint system itself accepts. The witness's claimed public
/// values are the instances.
pub fn mock_verify(
    witness: &VoteWitness,
    depth: usize,
    config: &CircuitConfig,
) -> Result<(), ProverError> {
    config.validate()?;
    let mut builder = new_builder(CircuitBuilderStage::Mock, config);
    assign_vote_circuit(&mut builder, witness, depth)?;
    builder.calculate_params(Some(MIN_ROWS));

    let prover = MockProver::run(config.k, &builder, vec![witness.public_inputs().to_vec()])
        .map_err(|e| ProverError::Verification(format!("MockProver::run failed: {:?}", e)))?;

    prover
        .verify()
        .map_err(|failures| ProverError::Verification(format!("{:?}", failures)))
}
