//! The persisted proof record.
//!
//! A record is deliberately lean: once issued, the anchored payload is the
//! durable source of truth for the proof's public content, and the record is
//! a cache/index pointing at it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::fingerprint::Fingerprint;
use crate::types::{now_utc, AnchorId, Identity, RecordId};

/// Lifecycle status derived from a record's fields.
///
/// Anchor presence is the only discriminator; there is no separate status
/// column that could drift out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofStatus {
    /// Created, not yet signed and anchored (or revoked).
    Pending,
    /// Signed and anchored; `anchor_reference` points at the payload.
    Issued,
}

/// One proof record, keyed by [`RecordId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    /// Primary key; also the tail of the public proof id.
    pub id: RecordId,

    /// Actor that requested the proof.
    pub owner_identity: Identity,

    /// Identity controlling the signing key used at issuance.
    pub controller_identity: Identity,

    /// Creation time; rewritten to the signature's own timestamp once
    /// issuance completes.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Correlation id lifted from the source document, if it had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_reference: Option<String>,

    /// Digest of the canonicalized source document. Set once at creation,
    /// never recomputed.
    pub content_fingerprint: Fingerprint,

    /// Anchor-store pointer; present exactly while the proof is issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_reference: Option<AnchorId>,
}

impl ProofRecord {
    /// Create a fresh pending record with a random id.
    pub fn new(
        owner_identity: Identity,
        controller_identity: Identity,
        subject_reference: Option<String>,
        content_fingerprint: Fingerprint,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            owner_identity,
            controller_identity,
            created_at: now_utc(),
            subject_reference,
            content_fingerprint,
            anchor_reference: None,
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ProofStatus {
        if self.anchor_reference.is_some() {
            ProofStatus::Issued
        } else {
            ProofStatus::Pending
        }
    }

    /// Apply a successful issuance: the anchor pointer plus the signature's
    /// own timestamp, which replaces the request timestamp.
    pub fn mark_issued(&mut self, anchor_reference: AnchorId, signed_at: OffsetDateTime) {
        self.anchor_reference = Some(anchor_reference);
        self.created_at = signed_at;
    }

    /// Clear the anchor pointer after revocation. The record reverts to a
    /// pending shape but is never re-issued automatically.
    pub fn mark_revoked(&mut self) {
        self.anchor_reference = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint_value;
    use serde_json::json;
    use time::macros::datetime;

    fn sample_record() -> ProofRecord {
        ProofRecord::new(
            Identity::new("did:example:owner"),
            Identity::new("did:example:controller"),
            Some("123".to_string()),
            fingerprint_value(&json!({"id": "123"})).unwrap(),
        )
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = sample_record();
        assert_eq!(record.status(), ProofStatus::Pending);
        assert!(record.anchor_reference.is_none());
    }

    #[test]
    fn test_mark_issued_sets_anchor_and_rewrites_created_at() {
        let mut record = sample_record();
        let signed_at = datetime!(2024-03-01 12:00:00 UTC);
        record.mark_issued(AnchorId::new("anchor-1"), signed_at);
        assert_eq!(record.status(), ProofStatus::Issued);
        assert_eq!(record.created_at, signed_at);
        assert_eq!(record.anchor_reference, Some(AnchorId::new("anchor-1")));
    }

    #[test]
    fn test_mark_revoked_clears_anchor() {
        let mut record = sample_record();
        record.mark_issued(AnchorId::new("anchor-1"), datetime!(2024-03-01 12:00:00 UTC));
        record.mark_revoked();
        assert_eq!(record.status(), ProofStatus::Pending);
        assert!(record.anchor_reference.is_none());
    }

    #[test]
    fn test_record_serde_camel_case() {
        let record = sample_record();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("ownerIdentity").is_some());
        assert!(value.get("contentFingerprint").is_some());
        assert!(value.get("createdAt").is_some());
        // Pending records omit the anchor field entirely.
        assert!(value.get("anchorReference").is_none());

        let back: ProofRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
