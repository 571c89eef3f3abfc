//! Strong type definitions for veristamp.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::error::CoreError;

/// Namespace prefix carried by every proof id this engine issues.
pub const PROOF_NAMESPACE: &str = "veristamp";

/// A 32-byte record identifier, generated randomly at proof creation.
///
/// This is the primary key of a [`crate::ProofRecord`] and the tail of the
/// public [`ProofId`]. Rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub [u8; 32]);

impl RecordId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a RecordId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for RecordId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for RecordId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A namespaced proof identifier: `veristamp:<hex64>`.
///
/// This is the only id callers ever see. Parsing rejects ids from foreign
/// namespaces before any storage is touched.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProofId(RecordId);

impl ProofId {
    /// Wrap a record id in the engine's namespace.
    pub const fn from_record(id: RecordId) -> Self {
        Self(id)
    }

    /// The underlying record id.
    pub const fn record_id(&self) -> RecordId {
        self.0
    }

    /// Parse a namespaced id, rejecting foreign namespaces.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let (namespace, rest) = s
            .split_once(':')
            .ok_or_else(|| CoreError::MalformedProofId(s.to_string()))?;
        if namespace != PROOF_NAMESPACE {
            return Err(CoreError::NamespaceMismatch(s.to_string()));
        }
        let record = RecordId::from_hex(rest)
            .map_err(|_| CoreError::MalformedProofId(s.to_string()))?;
        Ok(Self(record))
    }
}

impl fmt::Debug for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofId({}:{})", PROOF_NAMESPACE, &self.0.to_hex()[..16])
    }
}

impl fmt::Display for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", PROOF_NAMESPACE, self.0.to_hex())
    }
}

impl FromStr for ProofId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProofId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ProofId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A pointer into the external anchor store.
///
/// Opaque to the engine; presence on a record is what marks it issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(String);

impl AnchorId {
    /// Wrap a store-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An actor identity, e.g. a DID. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the identity is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Current UTC time, truncated to whole milliseconds.
///
/// Truncation keeps RFC 3339 renderings stable across a write/read cycle.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.replace_nanosecond(millis).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_hex_roundtrip() {
        let id = RecordId::from_bytes([0x42; 32]);
        let hex = id.to_hex();
        let recovered = RecordId::from_hex(&hex).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_record_id_debug_truncated() {
        let id = RecordId::from_bytes([0xcd; 32]);
        let debug = format!("{:?}", id);
        assert!(debug.starts_with("RecordId(cdcdcdcd"));
    }

    #[test]
    fn test_record_id_generate_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_proof_id_roundtrip() {
        let record = RecordId::from_bytes([0x01; 32]);
        let proof = ProofId::from_record(record);
        let rendered = proof.to_string();
        assert!(rendered.starts_with("veristamp:0101"));
        let parsed = ProofId::parse(&rendered).unwrap();
        assert_eq!(parsed.record_id(), record);
    }

    #[test]
    fn test_proof_id_foreign_namespace() {
        let err = ProofId::parse(&format!("other:{}", "00".repeat(32))).unwrap_err();
        assert!(matches!(err, CoreError::NamespaceMismatch(_)));
    }

    #[test]
    fn test_proof_id_malformed() {
        assert!(matches!(
            ProofId::parse("no-colon-here"),
            Err(CoreError::MalformedProofId(_))
        ));
        assert!(matches!(
            ProofId::parse("veristamp:zzzz"),
            Err(CoreError::MalformedProofId(_))
        ));
    }

    #[test]
    fn test_record_id_serde_as_hex_string() {
        let id = RecordId::from_bytes([0xab; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_identity_blank() {
        assert!(Identity::new("").is_blank());
        assert!(Identity::new("   ").is_blank());
        assert!(!Identity::new("did:example:1").is_blank());
    }

    #[test]
    fn test_now_utc_millisecond_precision() {
        let t = now_utc();
        assert_eq!(t.nanosecond() % 1_000_000, 0);
    }
}
