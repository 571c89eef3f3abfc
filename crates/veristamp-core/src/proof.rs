//! Public proof objects, detached signatures, and verification outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::document::{ContextList, CONTEXT_ANCHOR, CONTEXT_CORE, CONTEXT_DATA_INTEGRITY};
use crate::error::{CoreError, Result};
use crate::record::ProofRecord;
use crate::types::{Identity, ProofId};

/// Type tag carried by every signature this engine produces.
pub const PROOF_TYPE: &str = "DataIntegrityProof";

/// Cryptosuite identifier for Ed25519 over canonical JSON.
pub const PROOF_CRYPTOSUITE: &str = "eddsa-jcs-2022";

/// Purpose recorded on issued signatures.
pub const PROOF_PURPOSE: &str = "assertionMethod";

/// Type tag of the public proof object.
pub const PROOF_OBJECT_TYPE: &str = "ContentProof";

/// Fragment naming the assertion key on the controller identity.
pub const ASSERTION_METHOD_ID: &str = "proof-assertion";

/// Key id of the per-controller hashing secret mixed into signing inputs.
pub const PROOF_HASH_KEY_ID: &str = "proof-hash";

/// A detached data-integrity signature over a proof's signing input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofSignature {
    /// When the signature was produced. Becomes the record's `createdAt`.
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,

    /// Type tag, [`PROOF_TYPE`] for supported signatures.
    #[serde(rename = "type")]
    pub signature_type: String,

    /// Suite identifier, [`PROOF_CRYPTOSUITE`] for supported signatures.
    pub cryptosuite: String,

    /// Purpose, [`PROOF_PURPOSE`].
    pub proof_purpose: String,

    /// Multibase signature value: `z` followed by base58btc bytes.
    pub proof_value: String,

    /// `<controller>#<key fragment>` naming the verification key.
    pub verification_method: String,
}

impl ProofSignature {
    /// True if the suite identifier is one this engine can verify.
    pub fn suite_supported(&self) -> bool {
        self.cryptosuite == PROOF_CRYPTOSUITE
    }

    /// True if the type tag is one this engine recognizes.
    pub fn type_supported(&self) -> bool {
        self.signature_type == PROOF_TYPE
    }
}

/// Receipt returned by an anchor store describing a durable write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorReceipt {
    /// Store-specific receipt type tag.
    #[serde(rename = "type")]
    pub receipt_type: String,

    /// When the payload was anchored.
    #[serde(with = "time::serde::rfc3339")]
    pub anchored_at: OffsetDateTime,
}

/// The public, externally verifiable proof representation.
///
/// Combines record fields, the issuance signature, and (at read time) the
/// anchor receipt. The receipt is never part of the anchored payload; it is
/// attached when the proof is reconstructed for a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofObject {
    /// Linked-data contexts, core first.
    #[serde(rename = "@context")]
    pub context: Value,

    /// Object type tag, [`PROOF_OBJECT_TYPE`].
    #[serde(rename = "type")]
    pub object_type: String,

    /// Full namespaced proof id.
    pub id: ProofId,

    /// Actor that requested the proof.
    pub owner_identity: Identity,

    /// Identity controlling the signing key.
    pub controller_identity: Identity,

    /// Record creation time as captured in the signed projection. The
    /// record itself adopts the signature time at issuance; the object
    /// keeps this value so the signing input stays recomputable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Correlation id lifted from the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_reference: Option<String>,

    /// Digest of the canonicalized source document.
    pub content_fingerprint: crate::fingerprint::Fingerprint,

    /// Issuance signature; absent while pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<ProofSignature>,

    /// Anchor receipt; only attached at read time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_receipt: Option<AnchorReceipt>,
}

impl ProofObject {
    /// Build the base projection of a record: no signature, no receipt.
    pub fn from_record(record: &ProofRecord) -> Self {
        let context = ContextList::new()
            .with(CONTEXT_CORE)
            .with(CONTEXT_DATA_INTEGRITY);
        Self {
            context: context.to_value(),
            object_type: PROOF_OBJECT_TYPE.to_string(),
            id: ProofId::from_record(record.id),
            owner_identity: record.owner_identity.clone(),
            controller_identity: record.controller_identity.clone(),
            created_at: record.created_at,
            subject_reference: record.subject_reference.clone(),
            content_fingerprint: record.content_fingerprint.clone(),
            proof: None,
            anchor_receipt: None,
        }
    }

    /// Attach the signature produced at issuance. `createdAt` is left
    /// untouched: the signature covers the projection as it was signed,
    /// so rewriting it here would make the proof unverifiable.
    pub fn with_signature(mut self, signature: ProofSignature) -> Self {
        self.proof = Some(signature);
        self
    }

    /// Attach an anchor receipt under its own member, pushing the anchor
    /// context onto `@context`.
    pub fn attach_receipt(&mut self, receipt: AnchorReceipt) {
        let mut context = ContextList::from_value(&self.context);
        context.push(CONTEXT_ANCHOR.into());
        self.context = context.to_value();
        self.anchor_receipt = Some(receipt);
    }

    /// The projection that gets hashed and signed: signature and receipt
    /// removed, context reset to the core context alone.
    pub fn signing_projection(&self) -> Result<Value> {
        let mut copy = self.clone();
        copy.proof = None;
        copy.anchor_receipt = None;
        copy.context = Value::String(CONTEXT_CORE.to_string());
        serde_json::to_value(copy).map_err(|e| CoreError::MalformedProof(e.to_string()))
    }

    /// Serialize to a plain JSON value.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| CoreError::MalformedProof(e.to_string()))
    }

    /// Deserialize from a plain JSON value (e.g. an anchored payload).
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| CoreError::MalformedProof(e.to_string()))
    }
}

/// Why verification declined a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerifyFailure {
    /// No anchor reference: never issued, or revoked.
    NotIssued,
    /// The anchor store no longer returns a payload.
    ProofMissing,
    /// The anchored signature names an unsupported cryptosuite.
    CryptoSuiteMismatch,
    /// The anchored signature's type tag is not a recognized proof type.
    ProofTypeMismatch,
    /// The signature failed cryptographic verification.
    SignatureMismatch,
}

/// Result of verifying a proof. Failures are data, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// True only when an anchored signature passed cryptographic checks.
    pub verified: bool,

    /// Classification when `verified` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<VerifyFailure>,
}

impl VerifyOutcome {
    /// A passing outcome.
    pub const fn ok() -> Self {
        Self {
            verified: true,
            failure: None,
        }
    }

    /// A declining outcome with its classification.
    pub const fn failed(failure: VerifyFailure) -> Self {
        Self {
            verified: false,
            failure: Some(failure),
        }
    }
}
