//! Signing-key access.
//!
//! Key material reaches the engine only through the [`KeySource`] trait and
//! only for the duration of a single signing or verification call.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;

use veristamp_core::Identity;

use crate::error::{Result, SignerError};

/// 32 bytes of secret key material (an Ed25519 seed or a hashing salt).
#[derive(Clone, PartialEq, Eq)]
pub struct KeySecret([u8; 32]);

impl KeySecret {
    /// Wrap raw secret bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Generate a fresh random secret.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

// Never print key material.
impl fmt::Debug for KeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeySecret(..)")
    }
}

/// Source of signing-key material, keyed by controller identity and key id.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Fetch the secret for `controller`'s key `key_id`.
    ///
    /// Fails with [`SignerError::KeyNotFound`] when absent.
    async fn key_material(&self, controller: &Identity, key_id: &str) -> Result<KeySecret>;
}

/// In-memory key source for tests and embedding. Thread-safe via RwLock.
pub struct MemoryKeySource {
    inner: RwLock<HashMap<(String, String), KeySecret>>,
}

impl MemoryKeySource {
    /// Create an empty key source.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Register a secret for a controller's key id.
    pub fn insert(&self, controller: &Identity, key_id: &str, secret: KeySecret) {
        let mut inner = self.inner.write().unwrap();
        inner.insert((controller.as_str().to_string(), key_id.to_string()), secret);
    }
}

impl Default for MemoryKeySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeySource for MemoryKeySource {
    async fn key_material(&self, controller: &Identity, key_id: &str) -> Result<KeySecret> {
        let inner = self.inner.read().unwrap();
        inner
            .get(&(controller.as_str().to_string(), key_id.to_string()))
            .cloned()
            .ok_or_else(|| SignerError::KeyNotFound {
                controller: controller.as_str().to_string(),
                key_id: key_id.to_string(),
            })
    }
}
