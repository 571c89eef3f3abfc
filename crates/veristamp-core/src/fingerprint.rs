//! Content fingerprints.
//!
//! A fingerprint is a self-describing digest of a canonicalized document:
//! an algorithm tag joined to the lowercase hex digest, e.g.
//! `sha256:9f86d081...`. The tag lets verifiers detect an algorithm
//! mismatch without consulting external metadata.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::canonical_json_bytes;
use crate::error::{CoreError, Result};

/// Digest algorithms recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256, the issuing default.
    Sha256,
    /// Blake3, accepted on parse for forward compatibility.
    Blake3,
}

/// Algorithm used for newly computed fingerprints.
pub const DEFAULT_HASH_ALG: HashAlg = HashAlg::Sha256;

impl HashAlg {
    /// The tag rendered in front of the digest.
    pub const fn tag(&self) -> &'static str {
        match self {
            HashAlg::Sha256 => "sha256",
            HashAlg::Blake3 => "blake3",
        }
    }

    /// Resolve a tag back to an algorithm.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "sha256" => Ok(HashAlg::Sha256),
            "blake3" => Ok(HashAlg::Blake3),
            other => Err(CoreError::UnknownHashAlg(other.to_string())),
        }
    }

    /// Digest a byte string with this algorithm.
    pub fn digest(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            HashAlg::Sha256 => Sha256::digest(bytes).to_vec(),
            HashAlg::Blake3 => blake3::hash(bytes).as_bytes().to_vec(),
        }
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A self-describing content digest: `<alg>:<hex>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    alg: HashAlg,
    digest: Vec<u8>,
}

impl Fingerprint {
    /// Canonicalize and digest a JSON value.
    pub fn compute(alg: HashAlg, value: &Value) -> Result<Self> {
        let bytes = canonical_json_bytes(value)?;
        Ok(Self {
            alg,
            digest: alg.digest(&bytes),
        })
    }

    /// Parse a rendered fingerprint.
    pub fn parse(s: &str) -> Result<Self> {
        let (tag, hex_part) = s
            .split_once(':')
            .ok_or_else(|| CoreError::MalformedFingerprint(s.to_string()))?;
        let alg = HashAlg::from_tag(tag)?;
        let digest =
            hex::decode(hex_part).map_err(|_| CoreError::MalformedFingerprint(s.to_string()))?;
        if digest.len() != 32 {
            return Err(CoreError::MalformedFingerprint(s.to_string()));
        }
        Ok(Self { alg, digest })
    }

    /// The algorithm that produced this digest.
    pub const fn alg(&self) -> HashAlg {
        self.alg
    }

    /// The raw digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.alg.tag(), hex::encode(&self.digest))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fingerprint({}:{})",
            self.alg.tag(),
            &hex::encode(&self.digest)[..16]
        )
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Fingerprint a document with the default algorithm.
pub fn fingerprint_value(value: &Value) -> Result<Fingerprint> {
    Fingerprint::compute(DEFAULT_HASH_ALG, value)
}
