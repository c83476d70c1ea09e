//! Utility functions for field element encoding
//!
//! Hex strings are big-endian (the way explorers and calldata show them);
//! `Fr`'s native byte representation is little-endian.

use halo2_base::halo2_proofs::halo2curves::{bn256::Fr, ff::PrimeField};
use num_bigint::BigUint;
use thiserror::Error;

/// Error type for utility functions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtilError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("value is {0} bytes, at most 32 allowed")]
    TooLong(usize),
    #[error("field element out of range")]
    OutOfRange,
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),
}

/// Convert hex string to field element
///
/// Accepts strings with or without "0x" prefix. Values >= p are rejected,
/// never reduced.
pub fn hex_to_field(hex: &str) -> Result<Fr, UtilError> {
    let hex = hex.trim_start_matches("0x").trim_start_matches("0X");

    // Odd-length input is a leading nibble
    let normalized = if hex.len() % 2 == 1 {
        format!("0{hex}")
    } else {
        hex.to_string()
    };
    let bytes = hex::decode(&normalized).map_err(|e| UtilError::InvalidHex(e.to_string()))?;
    if bytes.len() > 32 {
        return Err(UtilError::TooLong(bytes.len()));
    }

    // Pad to 32 bytes, then flip to little-endian for from_repr
    let mut repr = [0u8; 32];
    let start = 32 - bytes.len();
    repr[start..].copy_from_slice(&bytes);
    repr.reverse();

    Fr::from_repr(repr.into()).into_option().ok_or(UtilError::OutOfRange)
}

/// Convert field element to 0x-prefixed, 64-digit big-endian hex
pub fn field_to_hex(field: &Fr) -> String {
    let mut bytes = field.to_repr();
    bytes.as_mut().reverse();
    format!("0x{}", hex::encode(bytes))
}

/// Parse an unsigned integer written as plain decimal digits or `0x` hex.
///
/// Signs, digit separators and whitespace are rejected. The value is not
/// reduced or range-checked; callers decide what `>= p` means for them.
pub fn parse_uint(value: &str) -> Result<BigUint, UtilError> {
    let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    let malformed = || match radix {
        16 => UtilError::InvalidHex(value.to_string()),
        _ => UtilError::InvalidDecimal(value.to_string()),
    };

    // BigUint::parse_bytes alone would take "+1_0" as 10
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }
    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or_else(malformed)
}

/// serde adapter: `Fr` as 0x-prefixed big-endian hex
pub mod serde_hex {
    use super::{field_to_hex, hex_to_field};
    use halo2_base::halo2_proofs::halo2curves::bn256::Fr;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Fr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&field_to_hex(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fr, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex_to_field(&s).map_err(D::Error::custom)
    }
}
