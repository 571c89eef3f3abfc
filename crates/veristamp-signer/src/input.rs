//! Signing-input construction.
//!
//! The byte string handed to the signer binds the canonical projection to
//! the controller's key material:
//!
//! ```text
//! sha256(secret) || sha256(canonical_json(projection))
//! ```
//!
//! The salt half keeps a signing input from being reproducible by anyone
//! who only knows the public projection; the document half pins the exact
//! content. Same secret and projection always yield the same input.

use serde_json::Value;
use sha2::{Digest, Sha256};

use veristamp_core::canonical_json_bytes;

use crate::error::Result;
use crate::keys::KeySecret;

/// Length in bytes of a signing input: two SHA-256 digests.
pub const SIGNING_INPUT_LEN: usize = 64;

/// Compute the signing input for a projection under a controller secret.
pub fn signing_input(secret: &KeySecret, projection: &Value) -> Result<Vec<u8>> {
    let canonical = canonical_json_bytes(projection)?;
    let mut out = Vec::with_capacity(SIGNING_INPUT_LEN);
    out.extend_from_slice(&Sha256::digest(secret.as_bytes()));
    out.extend_from_slice(&Sha256::digest(&canonical));
    Ok(out)
}
