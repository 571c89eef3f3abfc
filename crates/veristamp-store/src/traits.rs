//! Storage traits: the abstract interfaces for record and anchor persistence.
//!
//! These traits keep the engine storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests and embedding).

use async_trait::async_trait;

use veristamp_core::{AnchorId, AnchorReceipt, Identity, ProofRecord, RecordId};

use crate::error::Result;

/// A durably written anchor payload together with its receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnchor {
    /// The anchored bytes, exactly as written.
    pub payload: Vec<u8>,
    /// Receipt describing the write.
    pub receipt: AnchorReceipt,
}

/// Outcome of an anchor write: the content address plus its receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorWrite {
    /// Content address of the payload.
    pub anchor_id: AnchorId,
    /// Receipt describing the write.
    pub receipt: AnchorReceipt,
}

/// Compute the content address of an anchor payload.
///
/// Anchors are content-addressed, so writing the same bytes twice yields the
/// same id and deduplicates naturally.
pub fn content_address(payload: &[u8]) -> AnchorId {
    AnchorId::new(blake3::hash(payload).to_hex().to_string())
}

/// Async interface for proof-record persistence.
///
/// All mutations are single-record read-modify-write; no cross-record
/// transactions are required of implementations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace a record, keyed by its id.
    async fn put(&self, record: &ProofRecord) -> Result<()>;

    /// Fetch a record by id. Unknown ids are `Ok(None)`.
    async fn get(&self, id: &RecordId) -> Result<Option<ProofRecord>>;

    /// Delete a record. Deleting an unknown id is not an error.
    async fn remove(&self, id: &RecordId) -> Result<()>;

    /// List records without an anchor reference, oldest first.
    async fn list_pending(&self, limit: usize) -> Result<Vec<ProofRecord>>;
}

/// Async interface for the durable anchor store.
///
/// Write-once, content-addressed: `store` of identical bytes returns the
/// same id. `get` of an unknown id is `Ok(None)`, never an error.
#[async_trait]
pub trait AnchorStore: Send + Sync {
    /// Durably write a payload on behalf of a controller.
    async fn store(&self, controller: &Identity, payload: &[u8]) -> Result<AnchorWrite>;

    /// Fetch a previously anchored payload.
    async fn get(&self, id: &AnchorId) -> Result<Option<StoredAnchor>>;

    /// Remove an anchored payload. Removing an unknown id is not an error.
    async fn remove(&self, controller: &Identity, id: &AnchorId) -> Result<()>;
}
