// src/config.rs

use std::path::Path;

use serde::{Deserialize, Serialize};
use zkvox_circuits::{tree::MAX_DEPTH, CircuitConfig};

use crate::error::ConfigError;

/// Protocol parameters. Missing JSON keys fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Accumulator depth `D`; capacity is `2^D` members
    pub tree_depth: usize,
    /// Number of recent roots accepted for proofs (`H`)
    pub root_history_size: usize,
    pub circuit: CircuitConfig,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            tree_depth: 20,
            root_history_size: 30,
            circuit: CircuitConfig::default(),
        }
    }
}

impl ProtocolConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree_depth == 0 || self.tree_depth > MAX_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "tree_depth={} must be in 1..={}",
                self.tree_depth, MAX_DEPTH
            )));
        }
        if self.root_history_size == 0 {
            return Err(ConfigError::Invalid("root_history_size must be at least 1".into()));
        }
        self.circuit
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
