//! # veristamp-core
//!
//! Pure primitives for the veristamp proof engine: records, fingerprints,
//! canonical JSON, and proof objects.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over JSON documents and cryptographic digests.
//!
//! ## Key Types
//!
//! - [`ProofRecord`] - The persisted record tracking one proof
//! - [`RecordId`] / [`ProofId`] - Record primary key and its namespaced public form
//! - [`Fingerprint`] - Self-describing content digest (`alg:hex`)
//! - [`ProofObject`] - Public projection combining record, signature, receipt
//! - [`VerifyOutcome`] - Typed verification result with failure classification
//!
//! ## Canonicalization
//!
//! Documents and signing inputs are encoded as canonical JSON. See the
//! [`canonical`] module for the exact rules.

pub mod canonical;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod proof;
pub mod record;
pub mod types;

pub use canonical::{canonical_json_bytes, canonical_json_string};
pub use document::{
    subject_reference, validate_document, ContextList, CONTEXT_ANCHOR, CONTEXT_CORE,
    CONTEXT_DATA_INTEGRITY,
};
pub use error::{CoreError, Result};
pub use fingerprint::{fingerprint_value, Fingerprint, HashAlg, DEFAULT_HASH_ALG};
pub use proof::{
    AnchorReceipt, ProofObject, ProofSignature, VerifyFailure, VerifyOutcome,
    ASSERTION_METHOD_ID, PROOF_CRYPTOSUITE, PROOF_HASH_KEY_ID, PROOF_OBJECT_TYPE, PROOF_PURPOSE,
    PROOF_TYPE,
};
pub use record::{ProofRecord, ProofStatus};
pub use types::{now_utc, AnchorId, Identity, ProofId, RecordId, PROOF_NAMESPACE};
