//! # veristamp-signer
//!
//! Key access and data-integrity signing for the veristamp proof engine.
//!
//! ## Key Types
//!
//! - [`KeySource`] - Trait giving the engine scoped access to key material
//! - [`MemoryKeySource`] - In-memory key source for tests and embedding
//! - [`ProofSigner`] / [`Ed25519Signer`] - The signing primitive
//! - [`signing_input`] - Salted hash construction handed to the signer
//!
//! Key material never lives in this crate beyond one call: it is fetched,
//! used, and dropped.

pub mod error;
pub mod input;
pub mod keys;
pub mod signer;

pub use error::{Result, SignerError};
pub use input::{signing_input, SIGNING_INPUT_LEN};
pub use keys::{KeySecret, KeySource, MemoryKeySource};
pub use signer::{decode_proof_value, encode_proof_value, Ed25519Signer, ProofSigner};
