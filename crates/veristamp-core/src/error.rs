//! Error types for the veristamp core.

use thiserror::Error;

/// Core errors from canonicalization, fingerprinting, and proof assembly.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("non-finite number cannot be canonicalized")]
    NonFiniteNumber,

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("blank {0} identity")]
    BlankIdentity(&'static str),

    #[error("malformed fingerprint: {0}")]
    MalformedFingerprint(String),

    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlg(String),

    #[error("malformed proof id: {0}")]
    MalformedProofId(String),

    #[error("proof id from foreign namespace: {0}")]
    NamespaceMismatch(String),

    #[error("malformed proof object: {0}")]
    MalformedProof(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
