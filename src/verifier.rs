// src/verifier.rs

use std::sync::Arc;

use tracing::debug;
use zkvox_circuits::{Fr, VoteProver, NUM_PUBLIC_INPUTS};

use crate::config::ProtocolConfig;
use crate::error::ConfigError;

/// Proof-verification capability injected into the ledger.
///
/// `public_inputs` is `[root, nullifierHash, proposalId, vote]`, already
/// range-checked against the field modulus.
pub trait ProofVerifier {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr; NUM_PUBLIC_INPUTS]) -> bool;

    /// Tree depth the verifying key was generated for, if it is bound to
    /// one. A ledger refuses a verifier whose depth differs from its own.
    fn tree_depth(&self) -> Option<usize> {
        None
    }
}

/// halo2 KZG verification with the vote circuit's verifying key.
pub struct Halo2Verifier {
    prover: VoteProver,
}

impl Halo2Verifier {
    pub fn new(prover: VoteProver) -> Self {
        Self { prover }
    }

    /// Keygen for `config.tree_depth` with `config.circuit`, so the keys
    /// always match the ledger they are handed to.
    pub fn from_config(config: &ProtocolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(VoteProver::setup(config.tree_depth, &config.circuit)?))
    }

    /// The wrapped prover, for generating proofs against the same keys.
    pub fn prover(&self) -> &VoteProver {
        &self.prover
    }
}

impl ProofVerifier for Halo2Verifier {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr; NUM_PUBLIC_INPUTS]) -> bool {
        match self.prover.verify(proof, public_inputs) {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "halo2 verification failed");
                false
            }
        }
    }

    fn tree_depth(&self) -> Option<usize> {
        Some(self.prover.depth())
    }
}

/// Deterministic stand-in built from a closure.
pub struct FnVerifier<F>(pub F);

impl<F> ProofVerifier for FnVerifier<F>
where
    F: Fn(&[u8], &[Fr; NUM_PUBLIC_INPUTS]) -> bool,
{
    fn verify(&self, proof: &[u8], public_inputs: &[Fr; NUM_PUBLIC_INPUTS]) -> bool {
        (self.0)(proof, public_inputs)
    }
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for Arc<V> {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr; NUM_PUBLIC_INPUTS]) -> bool {
        (**self).verify(proof, public_inputs)
    }

    fn tree_depth(&self) -> Option<usize> {
        (**self).tree_depth()
    }
}

impl<V: ProofVerifier + ?Sized> ProofVerifier for &V {
    fn verify(&self, proof: &[u8], public_inputs: &[Fr; NUM_PUBLIC_INPUTS]) -> bool {
        (**self).verify(proof, public_inputs)
    }

    fn tree_depth(&self) -> Option<usize> {
        (**self).tree_depth()
    }
}
