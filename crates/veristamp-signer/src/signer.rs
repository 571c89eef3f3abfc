//! Proof signing and verification.
//!
//! [`Ed25519Signer`] is the engine's signing primitive: it pulls the
//! assertion key from a [`KeySource`], signs the prepared input, and emits a
//! detached data-integrity signature with a multibase proof value.

use std::sync::Arc;

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};

use veristamp_core::{
    now_utc, Identity, ProofSignature, PROOF_CRYPTOSUITE, PROOF_PURPOSE, PROOF_TYPE,
};

use crate::error::{Result, SignerError};
use crate::keys::KeySource;

/// Multibase prefix for base58btc.
const MULTIBASE_BASE58: char = 'z';

/// Encode signature bytes as a multibase proof value.
pub fn encode_proof_value(bytes: &[u8]) -> String {
    format!("{}{}", MULTIBASE_BASE58, bs58::encode(bytes).into_string())
}

/// Decode a multibase proof value back to signature bytes.
///
/// Returns `None` for a missing prefix or undecodable payload; a malformed
/// value is a failed signature, not a structural error.
pub fn decode_proof_value(value: &str) -> Option<Vec<u8>> {
    let rest = value.strip_prefix(MULTIBASE_BASE58)?;
    bs58::decode(rest).into_vec().ok()
}

/// The signing primitive: produces and checks detached signatures over
/// prepared signing inputs.
#[async_trait]
pub trait ProofSigner: Send + Sync {
    /// Sign `input` with the key named by `verification_method`
    /// (`<controller>#<fragment>`).
    async fn sign(
        &self,
        controller: &Identity,
        verification_method: &str,
        input: &[u8],
    ) -> Result<ProofSignature>;

    /// Check a signature against `input`. `Ok(false)` means the bytes do
    /// not verify; errors are reserved for unresolvable keys.
    async fn verify(&self, input: &[u8], signature: &ProofSignature) -> Result<bool>;
}

/// Ed25519 signer backed by a [`KeySource`].
pub struct Ed25519Signer {
    keys: Arc<dyn KeySource>,
}

impl Ed25519Signer {
    /// Create a signer over the given key source.
    pub fn new(keys: Arc<dyn KeySource>) -> Self {
        Self { keys }
    }

    async fn resolve_key(&self, verification_method: &str) -> Result<SigningKey> {
        let (controller, fragment) = split_method(verification_method)?;
        let secret = self.keys.key_material(&controller, fragment).await?;
        Ok(SigningKey::from_bytes(secret.as_bytes()))
    }
}

/// Split `<controller>#<fragment>` into its parts.
fn split_method(verification_method: &str) -> Result<(Identity, &str)> {
    match verification_method.rsplit_once('#') {
        Some((controller, fragment)) if !controller.is_empty() && !fragment.is_empty() => {
            Ok((Identity::new(controller), fragment))
        }
        _ => Err(SignerError::UnresolvableMethod(
            verification_method.to_string(),
        )),
    }
}

#[async_trait]
impl ProofSigner for Ed25519Signer {
    async fn sign(
        &self,
        controller: &Identity,
        verification_method: &str,
        input: &[u8],
    ) -> Result<ProofSignature> {
        let (method_controller, _) = split_method(verification_method)?;
        if method_controller != *controller {
            return Err(SignerError::UnresolvableMethod(format!(
                "{} does not belong to {}",
                verification_method, controller
            )));
        }

        let signing_key = self.resolve_key(verification_method).await?;
        let signature = signing_key.sign(input);

        Ok(ProofSignature {
            created: now_utc(),
            signature_type: PROOF_TYPE.to_string(),
            cryptosuite: PROOF_CRYPTOSUITE.to_string(),
            proof_purpose: PROOF_PURPOSE.to_string(),
            proof_value: encode_proof_value(&signature.to_bytes()),
            verification_method: verification_method.to_string(),
        })
    }

    async fn verify(&self, input: &[u8], signature: &ProofSignature) -> Result<bool> {
        let signing_key = self.resolve_key(&signature.verification_method).await?;
        let verifying_key = signing_key.verifying_key();

        let Some(bytes) = decode_proof_value(&signature.proof_value) else {
            return Ok(false);
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(bytes.as_slice()) else {
            return Ok(false);
        };
        let sig = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(input, &sig).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeySecret, MemoryKeySource};
    use veristamp_core::ASSERTION_METHOD_ID;

    fn signer_with_key(controller: &Identity) -> Ed25519Signer {
        let keys = MemoryKeySource::new();
        keys.insert(controller, ASSERTION_METHOD_ID, KeySecret::generate());
        Ed25519Signer::new(Arc::new(keys))
    }

    fn method(controller: &Identity) -> String {
        format!("{}#{}", controller, ASSERTION_METHOD_ID)
    }

    #[test]
    fn test_proof_value_roundtrip() {
        let bytes = [7u8; 64];
        let encoded = encode_proof_value(&bytes);
        assert!(encoded.starts_with('z'));
        assert_eq!(decode_proof_value(&encoded).unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_decode_rejects_missing_prefix() {
        assert!(decode_proof_value("3FXQjecWufY").is_none());
        assert!(decode_proof_value("").is_none());
    }

    #[test]
    fn test_split_method() {
        let (controller, fragment) = split_method("did:example:node#proof-assertion").unwrap();
        assert_eq!(controller.as_str(), "did:example:node");
        assert_eq!(fragment, "proof-assertion");

        assert!(split_method("no-fragment").is_err());
        assert!(split_method("#fragment-only").is_err());
        assert!(split_method("controller#").is_err());
    }

    #[tokio::test]
    async fn test_sign_then_verify() {
        let controller = Identity::new("did:example:node");
        let signer = signer_with_key(&controller);

        let input = [42u8; 64];
        let signature = signer
            .sign(&controller, &method(&controller), &input)
            .await
            .unwrap();

        assert_eq!(signature.signature_type, PROOF_TYPE);
        assert_eq!(signature.cryptosuite, PROOF_CRYPTOSUITE);
        assert_eq!(signature.proof_purpose, PROOF_PURPOSE);
        assert!(signature.proof_value.starts_with('z'));
        assert_eq!(signature.verification_method, method(&controller));

        assert!(signer.verify(&input, &signature).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_tampered_input() {
        let controller = Identity::new("did:example:node");
        let signer = signer_with_key(&controller);

        let input = [1u8; 64];
        let signature = signer
            .sign(&controller, &method(&controller), &input)
            .await
            .unwrap();

        let mut tampered = input;
        tampered[0] ^= 0xff;
        assert!(!signer.verify(&tampered, &signature).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_proof_value() {
        let controller = Identity::new("did:example:node");
        let signer = signer_with_key(&controller);

        let input = [2u8; 64];
        let mut signature = signer
            .sign(&controller, &method(&controller), &input)
            .await
            .unwrap();
        signature.proof_value = "not-multibase".to_string();

        assert!(!signer.verify(&input, &signature).await.unwrap());
    }

    #[tokio::test]
    async fn test_sign_with_foreign_method_fails() {
        let controller = Identity::new("did:example:node");
        let signer = signer_with_key(&controller);

        let err = signer
            .sign(&controller, "did:example:other#proof-assertion", &[0u8; 64])
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::UnresolvableMethod(_)));
    }

    #[tokio::test]
    async fn test_sign_without_key_fails() {
        let controller = Identity::new("did:example:unkeyed");
        let signer = Ed25519Signer::new(Arc::new(MemoryKeySource::new()));

        let err = signer
            .sign(&controller, &method(&controller), &[0u8; 64])
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::KeyNotFound { .. }));
    }
}
