// zkvox - Anonymous Vote Circuit
// Halo2 + KZG membership proofs over a Poseidon Merkle tree
// Axiom halo2_base (Mainnet V2, Trail of Bits audited)

pub mod error;
pub mod merkle; // Merkle path verification (in-circuit + native)
pub mod params; // KZG params loading, integrity check, circuit sizing
pub mod poseidon_hash; // Axiom halo2_base Poseidon (production-proven)
pub mod prover; // SHPLONK prover/verifier pair
pub mod tree; // Prover-side membership tree
pub mod utils;
pub mod vote; // Membership + nullifier + vote-range relation

pub use error::{CircuitError, ProverError};
pub use params::CircuitConfig;
pub use prover::{mock_verify, VoteProver};
pub use tree::{MembershipTree, MerklePath};
pub use vote::{VoteWitness, NUM_PUBLIC_INPUTS};

// Re-export Axiom stack
pub use halo2_base;
pub use halo2_base::halo2_proofs::halo2curves::bn256::Fr;
