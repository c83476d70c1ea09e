//! KZG parameter handling and circuit sizing.
//!
//! Production deployments read ceremony parameters from disk and pin their
//! Blake2b-512 digest. Without a configured path, parameters are generated
//! locally; such parameters have a known toxic waste and are only fit for
//! development.

use std::{fs::File, path::{Path, PathBuf}};

use blake2::{Blake2b512, Digest};
use halo2_base::halo2_proofs::{
    halo2curves::bn256::Bn256,
    poly::{commitment::Params, kzg::commitment::ParamsKZG},
    SerdeFormat,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ProverError;

/// Proving-system sizing and parameter source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// log2 of the number of rows
    pub k: u32,
    pub lookup_bits: usize,
    pub params_path: Option<PathBuf>,
    /// Expected hex Blake2b-512 digest of the params file
    pub params_blake2b: Option<String>,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            k: 14,
            lookup_bits: 8,
            params_path: None,
            params_blake2b: None,
        }
    }
}

impl CircuitConfig {
    pub fn validate(&self) -> Result<(), ProverError> {
        if !(10..=20).contains(&self.k) {
            return Err(ProverError::Config(format!(
                "k={} out of range, must be between 10 and 20",
                self.k
            )));
        }
        if self.lookup_bits == 0 || self.lookup_bits >= self.k as usize {
            return Err(ProverError::Config(format!(
                "lookup_bits={} must be in 1..{}",
                self.lookup_bits, self.k
            )));
        }
        Ok(())
    }

    /// Read params from `params_path`, or generate development params.
    pub fn load_params(&self) -> Result<ParamsKZG<Bn256>, ProverError> {
        match &self.params_path {
            Some(path) => read_params(path, self.k, self.params_blake2b.as_deref()),
            None => {
                warn!(k = self.k, "generating local KZG params; do not use in production");
                Ok(setup_params(self.k))
            }
        }
    }
}

/// Fresh (insecure) params for `k`.
pub fn setup_params(k: u32) -> ParamsKZG<Bn256> {
    ParamsKZG::<Bn256>::setup(k, OsRng)
}

/// Hex Blake2b-512 digest of a params file's bytes.
pub fn params_digest(bytes: &[u8]) -> String {
    format!("{:x}", Blake2b512::digest(bytes))
}

/// Read params from `path`, checking the digest when one is pinned.
///
/// Larger params are downsized to `k`; smaller ones are rejected.
pub fn read_params(
    path: &Path,
    k: u32,
    expected_digest: Option<&str>,
) -> Result<ParamsKZG<Bn256>, ProverError> {
    let bytes = std::fs::read(path)?;

    if let Some(expected) = expected_digest {
        let actual = params_digest(&bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(ProverError::ParamsDigest {
                expected: expected.to_string(),
                actual,
            });
        }
    }

    let mut params =
        ParamsKZG::<Bn256>::read_custom(&mut bytes.as_slice(), SerdeFormat::RawBytesUnchecked)?;
    if params.k() < k {
        return Err(ProverError::ParamsSize { expected: k, actual: params.k() });
    }
    if params.k() > k {
        params.downsize(k);
    }

    info!(path = %path.display(), k, "loaded KZG params");
    Ok(params)
}

/// Write params in the raw format `read_params` expects.
pub fn write_params(params: &ParamsKZG<Bn256>, path: &Path) -> Result<(), ProverError> {
    let mut file = File::create(path)?;
    params.write_custom(&mut file, SerdeFormat::RawBytesUnchecked)?;
    info!(path = %path.display(), k = params.k(), "wrote KZG params");
    Ok(())
}
