//! Error types for the proof service.

use thiserror::Error;

use veristamp_core::types::ProofId;
use veristamp_core::CoreError;
use veristamp_pipeline::PipelineError;
use veristamp_signer::SignerError;
use veristamp_store::StoreError;

/// Errors surfaced by [`ProofService`](crate::ProofService) operations.
///
/// Verification outcomes are not errors: "not issued" and "signature
/// invalid" come back as typed [`VerifyOutcome`](veristamp_core::VerifyOutcome)
/// values. Errors are reserved for structural problems.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed input document or missing identity.
    #[error("validation error: {0}")]
    Validation(String),

    /// A well-formed proof id with no record behind it.
    #[error("proof not found: {0}")]
    NotFound(ProofId),

    /// The id belongs to a foreign namespace.
    #[error("namespace mismatch: {0}")]
    NamespaceMismatch(String),

    /// The controller has no key material under the requested key id.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The signing primitive failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The anchor store failed.
    #[error("anchoring failed: {0}")]
    Anchoring(String),

    /// Record storage failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Anything unexpected, reported without leaking internals.
    #[error("internal error: {0}")]
    General(String),
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NamespaceMismatch(id) => ServiceError::NamespaceMismatch(id),
            CoreError::MalformedProofId(_)
            | CoreError::InvalidDocument(_)
            | CoreError::BlankIdentity(_)
            | CoreError::NonFiniteNumber => ServiceError::Validation(e.to_string()),
            CoreError::MalformedFingerprint(_)
            | CoreError::UnknownHashAlg(_)
            | CoreError::MalformedProof(_) => ServiceError::General(e.to_string()),
        }
    }
}

impl From<SignerError> for ServiceError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::KeyNotFound { .. } => ServiceError::KeyNotFound(e.to_string()),
            SignerError::Core(inner) => inner.into(),
            SignerError::UnresolvableMethod(_) | SignerError::SigningFailed(_) => {
                ServiceError::Signing(e.to_string())
            }
        }
    }
}

impl From<PipelineError> for ServiceError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Store(inner) => ServiceError::Store(inner),
            PipelineError::Signer(inner) => inner.into(),
            PipelineError::Core(inner) => inner.into(),
            _ => ServiceError::General(e.to_string()),
        }
    }
}

/// Result type for proof service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
