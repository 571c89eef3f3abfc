//! Error types for the signer module.

use thiserror::Error;

/// Errors that can occur during key access and signing.
#[derive(Debug, Error)]
pub enum SignerError {
    /// No key material exists for the given controller and key id.
    #[error("key not found: {controller}#{key_id}")]
    KeyNotFound { controller: String, key_id: String },

    /// A verification method string did not name a resolvable key.
    #[error("unresolvable verification method: {0}")]
    UnresolvableMethod(String),

    /// Signing backend failure.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Canonicalization or projection error from the core.
    #[error(transparent)]
    Core(#[from] veristamp_core::CoreError),
}

/// Result type for signer operations.
pub type Result<T> = std::result::Result<T, SignerError>;
