//! In-memory implementations of the storage traits.
//!
//! Primarily for tests and embedding. Same semantics as the SQLite backend
//! but nothing survives a drop.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use veristamp_core::{now_utc, AnchorId, AnchorReceipt, Identity, ProofRecord, RecordId};

use crate::error::Result;
use crate::traits::{content_address, AnchorStore, AnchorWrite, RecordStore, StoredAnchor};

/// Receipt type tag produced by [`MemoryAnchorStore`].
pub const MEMORY_RECEIPT_TYPE: &str = "MemoryAnchorReceipt";

/// In-memory record store. Thread-safe via RwLock.
pub struct MemoryRecordStore {
    inner: RwLock<HashMap<RecordId, ProofRecord>>,
}

impl MemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// True if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, record: &ProofRecord) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<ProofRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.get(id).cloned())
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.remove(id);
        Ok(())
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<ProofRecord>> {
        let inner = self.inner.read().unwrap();
        let mut pending: Vec<ProofRecord> = inner
            .values()
            .filter(|r| r.anchor_reference.is_none())
            .cloned()
            .collect();
        // Tie-break on id so the order is total.
        pending.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_bytes().cmp(b.id.as_bytes()))
        });
        pending.truncate(limit);
        Ok(pending)
    }
}

/// In-memory anchor store. Content-addressed and write-once like the real
/// thing; `remove` actually deletes, which is what revocation relies on.
pub struct MemoryAnchorStore {
    inner: RwLock<HashMap<AnchorId, StoredAnchor>>,
}

impl MemoryAnchorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Number of anchored payloads.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// True if nothing is anchored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryAnchorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnchorStore for MemoryAnchorStore {
    async fn store(&self, _controller: &Identity, payload: &[u8]) -> Result<AnchorWrite> {
        let anchor_id = content_address(payload);
        let mut inner = self.inner.write().unwrap();
        let stored = inner.entry(anchor_id.clone()).or_insert_with(|| StoredAnchor {
            payload: payload.to_vec(),
            receipt: AnchorReceipt {
                receipt_type: MEMORY_RECEIPT_TYPE.to_string(),
                anchored_at: now_utc(),
            },
        });
        Ok(AnchorWrite {
            anchor_id,
            receipt: stored.receipt.clone(),
        })
    }

    async fn get(&self, id: &AnchorId) -> Result<Option<StoredAnchor>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.get(id).cloned())
    }

    async fn remove(&self, _controller: &Identity, id: &AnchorId) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veristamp_core::fingerprint_value;

    fn record(owner: &str) -> ProofRecord {
        ProofRecord::new(
            Identity::new(owner),
            Identity::new("did:example:node"),
            None,
            fingerprint_value(&json!({"owner": owner})).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_record_put_get_roundtrip() {
        let store = MemoryRecordStore::new();
        let rec = record("did:example:a");
        store.put(&rec).await.unwrap();
        let got = store.get(&rec.id).await.unwrap().unwrap();
        assert_eq!(got, rec);
    }

    #[tokio::test]
    async fn test_record_get_unknown_is_none() {
        let store = MemoryRecordStore::new();
        let id = RecordId::from_bytes([9u8; 32]);
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_put_replaces() {
        let store = MemoryRecordStore::new();
        let mut rec = record("did:example:a");
        store.put(&rec).await.unwrap();
        rec.mark_issued(AnchorId::new("anchor-1"), now_utc());
        store.put(&rec).await.unwrap();
        let got = store.get(&rec.id).await.unwrap().unwrap();
        assert_eq!(got.anchor_reference, Some(AnchorId::new("anchor-1")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_pending_skips_issued_and_orders_oldest_first() {
        let store = MemoryRecordStore::new();

        let mut oldest = record("did:example:old");
        oldest.created_at = oldest.created_at - time::Duration::seconds(60);
        let newer = record("did:example:new");
        let mut issued = record("did:example:done");
        issued.mark_issued(AnchorId::new("anchor-1"), now_utc());

        store.put(&newer).await.unwrap();
        store.put(&oldest).await.unwrap();
        store.put(&issued).await.unwrap();

        let pending = store.list_pending(10).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, oldest.id);
        assert_eq!(pending[1].id, newer.id);

        let limited = store.list_pending(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, oldest.id);
    }

    #[tokio::test]
    async fn test_anchor_store_roundtrip_and_dedupe() {
        let store = MemoryAnchorStore::new();
        let controller = Identity::new("did:example:node");

        let first = store.store(&controller, b"payload-bytes").await.unwrap();
        let second = store.store(&controller, b"payload-bytes").await.unwrap();
        assert_eq!(first.anchor_id, second.anchor_id);
        assert_eq!(store.len(), 1);

        let got = store.get(&first.anchor_id).await.unwrap().unwrap();
        assert_eq!(got.payload, b"payload-bytes");
        assert_eq!(got.receipt.receipt_type, MEMORY_RECEIPT_TYPE);
    }

    #[tokio::test]
    async fn test_anchor_get_unknown_is_none() {
        let store = MemoryAnchorStore::new();
        assert!(store.get(&AnchorId::new("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_anchor_remove_is_idempotent() {
        let store = MemoryAnchorStore::new();
        let controller = Identity::new("did:example:node");
        let write = store.store(&controller, b"to-remove").await.unwrap();

        store.remove(&controller, &write.anchor_id).await.unwrap();
        assert!(store.get(&write.anchor_id).await.unwrap().is_none());
        // A second remove of the same id succeeds.
        store.remove(&controller, &write.anchor_id).await.unwrap();
    }
}
