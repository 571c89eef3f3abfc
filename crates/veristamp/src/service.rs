//! The proof service: unified API over fingerprinting, storage, signing,
//! and the issuance pipeline.
//!
//! `create` is the only write path callers see. It fingerprints the
//! document, persists a pending record, and enqueues issuance; signing
//! and anchoring happen off the request path. `get`, `verify`, and
//! `revoke` operate on the namespaced proof id.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use veristamp_core::canonical::canonical_json_bytes;
use veristamp_core::document::{subject_reference, validate_document};
use veristamp_core::fingerprint::fingerprint_value;
use veristamp_core::proof::{
    ProofObject, VerifyFailure, VerifyOutcome, ASSERTION_METHOD_ID, PROOF_HASH_KEY_ID,
};
use veristamp_core::record::ProofRecord;
use veristamp_core::types::{Identity, ProofId};
use veristamp_pipeline::{IssuanceTask, TaskQueue};
use veristamp_signer::{signing_input, KeySource, ProofSigner};
use veristamp_store::traits::{AnchorStore, RecordStore};

use crate::error::{Result, ServiceError};

/// The main service struct.
///
/// Collaborators are injected as trait objects, so deployments choose
/// their own storage, key source, signer, and queue implementations.
pub struct ProofService {
    records: Arc<dyn RecordStore>,
    anchors: Arc<dyn AnchorStore>,
    keys: Arc<dyn KeySource>,
    signer: Arc<dyn ProofSigner>,
    queue: Arc<dyn TaskQueue>,
}

impl ProofService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        anchors: Arc<dyn AnchorStore>,
        keys: Arc<dyn KeySource>,
        signer: Arc<dyn ProofSigner>,
        queue: Arc<dyn TaskQueue>,
    ) -> Self {
        Self {
            records,
            anchors,
            keys,
            signer,
            queue,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────────────────────

    /// Request a proof over `document`.
    ///
    /// Fingerprints the document, persists a pending record, and enqueues
    /// the signing task. Returns as soon as the record is durable; the
    /// caller polls `get`/`verify` (or subscribes to completion events)
    /// for issuance. The document itself is discarded after
    /// fingerprinting and never stored or queued.
    pub async fn create(
        &self,
        document: &Value,
        owner_identity: Identity,
        controller_identity: Identity,
    ) -> Result<ProofId> {
        if owner_identity.is_blank() {
            return Err(ServiceError::Validation(
                "ownerIdentity must not be blank".to_string(),
            ));
        }
        if controller_identity.is_blank() {
            return Err(ServiceError::Validation(
                "controllerIdentity must not be blank".to_string(),
            ));
        }
        validate_document(document)?;

        let fingerprint = fingerprint_value(document)?;
        let subject = subject_reference(document);
        let record = ProofRecord::new(
            owner_identity,
            controller_identity.clone(),
            subject,
            fingerprint,
        );

        // The salt binds the signing input to the controller's key
        // material. Fetch it before persisting anything so a missing key
        // fails this call instead of stranding a record in the pipeline.
        let secret = self
            .keys
            .key_material(&controller_identity, PROOF_HASH_KEY_ID)
            .await?;
        let projection = ProofObject::from_record(&record).signing_projection()?;
        let input = signing_input(&secret, &projection)?;

        self.records.put(&record).await?;
        self.queue
            .enqueue(IssuanceTask {
                record_id: record.id,
                controller_identity: controller_identity.clone(),
                verification_method: verification_method(&controller_identity),
                signing_input: input,
            })
            .await?;

        let proof_id = ProofId::from_record(record.id);
        debug!(proof = %proof_id, controller = %controller_identity, "proof requested");
        Ok(proof_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read
    // ─────────────────────────────────────────────────────────────────────────

    /// Reconstruct the public proof object behind `proof_id`.
    ///
    /// Pending proofs come back without a `proof` member. Issued proofs
    /// are rebuilt from the anchored payload, which is the source of
    /// truth for public content, with the anchor receipt attached under
    /// its own member.
    pub async fn get(&self, proof_id: &str) -> Result<ProofObject> {
        let (id, record) = self.load(proof_id).await?;
        let Some(anchor_id) = record.anchor_reference.clone() else {
            return Ok(ProofObject::from_record(&record));
        };
        let stored = self
            .anchors
            .get(&anchor_id)
            .await
            .map_err(|e| ServiceError::Anchoring(e.to_string()))?
            .ok_or_else(|| ServiceError::General(format!("anchored payload missing for {id}")))?;
        let mut object = decode_payload(&stored.payload)?;
        object.attach_receipt(stored.receipt);
        Ok(object)
    }

    /// Classify the trust status of `proof_id`.
    ///
    /// The checks run in a fixed priority order and the first failing
    /// one wins: issued at all, payload retrievable, suite supported,
    /// type recognized, signature valid. Failures are data on the
    /// outcome, never errors.
    pub async fn verify(&self, proof_id: &str) -> Result<VerifyOutcome> {
        let (_, record) = self.load(proof_id).await?;
        let Some(anchor_id) = record.anchor_reference.clone() else {
            return Ok(VerifyOutcome::failed(VerifyFailure::NotIssued));
        };
        let Some(stored) = self
            .anchors
            .get(&anchor_id)
            .await
            .map_err(|e| ServiceError::Anchoring(e.to_string()))?
        else {
            return Ok(VerifyOutcome::failed(VerifyFailure::ProofMissing));
        };
        let object = decode_payload(&stored.payload)?;

        let Some(proof) = object.proof.clone() else {
            // No signature at all: the suite gate is the first check it
            // cannot pass.
            return Ok(VerifyOutcome::failed(VerifyFailure::CryptoSuiteMismatch));
        };
        if !proof.suite_supported() {
            return Ok(VerifyOutcome::failed(VerifyFailure::CryptoSuiteMismatch));
        }
        if !proof.type_supported() {
            return Ok(VerifyOutcome::failed(VerifyFailure::ProofTypeMismatch));
        }

        // Recompute the signing input from the anchored payload, not the
        // local record: the record's timestamp was rewritten at issuance
        // and the payload is what the signature covers.
        let secret = self
            .keys
            .key_material(&object.controller_identity, PROOF_HASH_KEY_ID)
            .await?;
        let projection = object.signing_projection()?;
        let input = signing_input(&secret, &projection)?;
        if !self.signer.verify(&input, &proof).await? {
            return Ok(VerifyOutcome::failed(VerifyFailure::SignatureMismatch));
        }
        Ok(VerifyOutcome::ok())
    }

    /// List records still awaiting issuance, oldest first.
    pub async fn pending(&self, limit: usize) -> Result<Vec<ProofRecord>> {
        Ok(self.records.list_pending(limit).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Revocation
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove the anchored payload behind `proof_id` and clear the
    /// record's anchor pointer.
    ///
    /// Idempotent: revoking an already revoked (or never issued) proof
    /// succeeds without touching the anchor store. The record is kept and
    /// is never re-issued automatically.
    pub async fn revoke(&self, proof_id: &str, controller_identity: &Identity) -> Result<()> {
        if controller_identity.is_blank() {
            return Err(ServiceError::Validation(
                "controllerIdentity must not be blank".to_string(),
            ));
        }
        let (id, mut record) = self.load(proof_id).await?;
        let Some(anchor_id) = record.anchor_reference.clone() else {
            return Ok(());
        };
        self.anchors
            .remove(controller_identity, &anchor_id)
            .await
            .map_err(|e| ServiceError::Anchoring(e.to_string()))?;
        record.mark_revoked();
        self.records.put(&record).await?;
        info!(proof = %id, "anchor revoked");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Parse the id and fetch its record. The namespace check happens
    /// before any storage access.
    async fn load(&self, proof_id: &str) -> Result<(ProofId, ProofRecord)> {
        let id = ProofId::parse(proof_id)?;
        let record = self
            .records
            .get(&id.record_id())
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        Ok((id, record))
    }
}

/// Verification method naming the controller's assertion key.
pub fn verification_method(controller: &Identity) -> String {
    format!("{controller}#{ASSERTION_METHOD_ID}")
}

/// The canonical bytes a record's proof object would anchor as. Exposed
/// for embedders that mirror anchored payloads elsewhere.
pub fn anchored_payload(object: &ProofObject) -> Result<Vec<u8>> {
    Ok(canonical_json_bytes(&object.to_value()?)?)
}

fn decode_payload(payload: &[u8]) -> Result<ProofObject> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| ServiceError::General(format!("anchored payload unreadable: {e}")))?;
    Ok(ProofObject::from_value(value)?)
}
