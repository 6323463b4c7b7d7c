//! # Hash Kinds: Digest Algorithms Accepted as Evidence
//!
//! Defines `HashKind`, the closed set of digest algorithms a forensic hash
//! may be declared with, and the hex length each one produces. The
//! [`Rule::HashDigest`](crate::Rule::HashDigest) rule uses the length to
//! check a submitted digest string.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A digest algorithm with a fixed hex-encoded output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HashKind {
    /// SHA-256, 32 bytes.
    Sha256,
    /// SHA-384, 48 bytes.
    Sha384,
    /// SHA-512, 64 bytes.
    Sha512,
    /// BLAKE2b with its full 64-byte output.
    Blake2b,
    /// BLAKE2s with its full 32-byte output.
    Blake2s,
}

impl HashKind {
    /// All supported kinds in canonical order.
    pub fn all() -> &'static [HashKind] {
        &[
            Self::Sha256,
            Self::Sha384,
            Self::Sha512,
            Self::Blake2b,
            Self::Blake2s,
        ]
    }

    /// Canonical upper-case algorithm name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Blake2b => "BLAKE2B",
            Self::Blake2s => "BLAKE2S",
        }
    }

    /// Number of hex characters in a digest of this kind.
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Sha256 | Self::Blake2s => 64,
            Self::Sha384 => 96,
            Self::Sha512 | Self::Blake2b => 128,
        }
    }
}

impl std::fmt::Display for HashKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hash type string that names no supported algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported hash type: {0:?}")]
pub struct UnknownHashKind(pub String);

impl FromStr for HashKind {
    type Err = UnknownHashKind;

    /// Parse an algorithm name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownHashKind(s.to_string()))
    }
}
