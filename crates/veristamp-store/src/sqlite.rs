//! SQLite implementation of the storage traits.
//!
//! The primary persistent backend: one database file holds both proof
//! records and anchored payloads. Uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use veristamp_core::{AnchorId, AnchorReceipt, Fingerprint, Identity, ProofRecord, RecordId};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{content_address, AnchorStore, AnchorWrite, RecordStore, StoredAnchor};

/// Receipt type tag produced by the SQLite anchor backend.
pub const SQLITE_RECEIPT_TYPE: &str = "SqliteAnchorReceipt";

/// SQLite-backed store implementing both [`RecordStore`] and [`AnchorStore`].
///
/// Thread-safe via an internal mutex; every operation runs on the blocking
/// pool so the async runtime is never stalled on database I/O.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a database at the given path, creating and migrating as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| StoreError::Lock(e.to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Raw column values for one proof record row.
struct RecordRow {
    record_id: String,
    owner_identity: String,
    controller_identity: String,
    created_at: String,
    subject_reference: Option<String>,
    content_fingerprint: String,
    anchor_reference: Option<String>,
}

const RECORD_COLUMNS: &str = "record_id, owner_identity, controller_identity, created_at, \
                              subject_reference, content_fingerprint, anchor_reference";

fn read_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        record_id: row.get(0)?,
        owner_identity: row.get(1)?,
        controller_identity: row.get(2)?,
        created_at: row.get(3)?,
        subject_reference: row.get(4)?,
        content_fingerprint: row.get(5)?,
        anchor_reference: row.get(6)?,
    })
}

fn parse_record(row: RecordRow) -> Result<ProofRecord> {
    Ok(ProofRecord {
        id: RecordId::from_hex(&row.record_id)
            .map_err(|e| StoreError::InvalidData(format!("record id: {}", e)))?,
        owner_identity: Identity::new(row.owner_identity),
        controller_identity: Identity::new(row.controller_identity),
        created_at: parse_rfc3339(&row.created_at)?,
        subject_reference: row.subject_reference,
        content_fingerprint: Fingerprint::parse(&row.content_fingerprint)
            .map_err(|e| StoreError::InvalidData(format!("fingerprint: {}", e)))?,
        anchor_reference: row.anchor_reference.map(AnchorId::new),
    })
}

fn parse_rfc3339(s: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(s, &Rfc3339)
        .map_err(|e| StoreError::InvalidData(format!("timestamp: {}", e)))
}

fn format_rfc3339(t: OffsetDateTime) -> Result<String> {
    t.format(&Rfc3339)
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

fn unix_millis(t: OffsetDateTime) -> i64 {
    (t.unix_timestamp_nanos() / 1_000_000) as i64
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn put(&self, record: &ProofRecord) -> Result<()> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let created_at = format_rfc3339(record.created_at)?;
            conn.execute(
                "INSERT OR REPLACE INTO proof_records (
                    record_id, owner_identity, controller_identity, created_at,
                    created_ms, subject_reference, content_fingerprint, anchor_reference
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id.to_hex(),
                    record.owner_identity.as_str(),
                    record.controller_identity.as_str(),
                    created_at,
                    unix_millis(record.created_at),
                    record.subject_reference.as_deref(),
                    record.content_fingerprint.to_string(),
                    record.anchor_reference.as_ref().map(|a| a.as_str()),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<ProofRecord>> {
        let id = *id;
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT {} FROM proof_records WHERE record_id = ?1",
                        RECORD_COLUMNS
                    ),
                    params![id.to_hex()],
                    read_record_row,
                )
                .optional()?;
            row.map(parse_record).transpose()
        })
        .await
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        let id = *id;
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM proof_records WHERE record_id = ?1",
                params![id.to_hex()],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<ProofRecord>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM proof_records
                 WHERE anchor_reference IS NULL
                 ORDER BY created_ms ASC, record_id ASC
                 LIMIT ?1",
                RECORD_COLUMNS
            ))?;
            let rows = stmt.query_map(params![limit as i64], read_record_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(parse_record(row?)?);
            }
            Ok(records)
        })
        .await
    }
}

#[async_trait]
impl AnchorStore for SqliteStore {
    async fn store(&self, controller: &Identity, payload: &[u8]) -> Result<AnchorWrite> {
        let controller = controller.clone();
        let payload = payload.to_vec();
        self.with_conn(move |conn| {
            let anchor_id = content_address(&payload);
            let anchored_at = veristamp_core::now_utc();

            // Write-once: a repeated store of the same bytes keeps the
            // original row and its receipt.
            conn.execute(
                "INSERT OR IGNORE INTO anchors (
                    anchor_id, controller_identity, payload, receipt_type, anchored_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    anchor_id.as_str(),
                    controller.as_str(),
                    payload,
                    SQLITE_RECEIPT_TYPE,
                    format_rfc3339(anchored_at)?,
                ],
            )?;

            let (receipt_type, stored_at): (String, String) = conn.query_row(
                "SELECT receipt_type, anchored_at FROM anchors WHERE anchor_id = ?1",
                params![anchor_id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(AnchorWrite {
                anchor_id,
                receipt: AnchorReceipt {
                    receipt_type,
                    anchored_at: parse_rfc3339(&stored_at)?,
                },
            })
        })
        .await
    }

    async fn get(&self, id: &AnchorId) -> Result<Option<StoredAnchor>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let row: Option<(Vec<u8>, String, String)> = conn
                .query_row(
                    "SELECT payload, receipt_type, anchored_at FROM anchors WHERE anchor_id = ?1",
                    params![id.as_str()],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()?;

            row.map(|(payload, receipt_type, anchored_at)| {
                Ok(StoredAnchor {
                    payload,
                    receipt: AnchorReceipt {
                        receipt_type,
                        anchored_at: parse_rfc3339(&anchored_at)?,
                    },
                })
            })
            .transpose()
        })
        .await
    }

    async fn remove(&self, _controller: &Identity, id: &AnchorId) -> Result<()> {
        let id = id.clone();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM anchors WHERE anchor_id = ?1", params![id.as_str()])?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use veristamp_core::{fingerprint_value, now_utc};

    fn record(subject: Option<&str>) -> ProofRecord {
        ProofRecord::new(
            Identity::new("did:example:owner"),
            Identity::new("did:example:node"),
            subject.map(str::to_string),
            fingerprint_value(&json!({"subject": subject})).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_record_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let rec = record(Some("urn:subject:1"));
        store.put(&rec).await.unwrap();

        let got = RecordStore::get(&store, &rec.id).await.unwrap().unwrap();
        assert_eq!(got, rec);
    }

    #[tokio::test]
    async fn test_record_get_unknown_is_none() {
        let store = SqliteStore::open_memory().unwrap();
        let id = RecordId::from_bytes([7u8; 32]);
        assert!(RecordStore::get(&store, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_put_is_upsert() {
        let store = SqliteStore::open_memory().unwrap();
        let mut rec = record(None);
        store.put(&rec).await.unwrap();

        rec.mark_issued(AnchorId::new("anchor-xyz"), now_utc());
        store.put(&rec).await.unwrap();

        let got = RecordStore::get(&store, &rec.id).await.unwrap().unwrap();
        assert_eq!(got.anchor_reference, Some(AnchorId::new("anchor-xyz")));
        assert_eq!(got.created_at, rec.created_at);
    }

    #[tokio::test]
    async fn test_record_remove() {
        let store = SqliteStore::open_memory().unwrap();
        let rec = record(None);
        store.put(&rec).await.unwrap();
        RecordStore::remove(&store, &rec.id).await.unwrap();
        assert!(RecordStore::get(&store, &rec.id).await.unwrap().is_none());
        // Removing again is not an error.
        RecordStore::remove(&store, &rec.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_pending_oldest_first_with_limit() {
        let store = SqliteStore::open_memory().unwrap();

        let mut oldest = record(None);
        oldest.created_at = oldest.created_at - time::Duration::minutes(5);
        let newer = record(None);
        let mut issued = record(None);
        issued.mark_issued(AnchorId::new("anchor-1"), now_utc());

        store.put(&newer).await.unwrap();
        store.put(&oldest).await.unwrap();
        store.put(&issued).await.unwrap();

        let pending = store.list_pending(10).await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, oldest.id);

        let limited = store.list_pending(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, oldest.id);
    }

    #[tokio::test]
    async fn test_anchor_roundtrip_and_write_once() {
        let store = SqliteStore::open_memory().unwrap();
        let controller = Identity::new("did:example:node");

        let first = store.store(&controller, b"anchored-bytes").await.unwrap();
        let second = store.store(&controller, b"anchored-bytes").await.unwrap();
        assert_eq!(first.anchor_id, second.anchor_id);
        assert_eq!(first.receipt, second.receipt);

        let got = AnchorStore::get(&store, &first.anchor_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.payload, b"anchored-bytes");
        assert_eq!(got.receipt.receipt_type, SQLITE_RECEIPT_TYPE);
    }

    #[tokio::test]
    async fn test_anchor_remove_then_get_is_none() {
        let store = SqliteStore::open_memory().unwrap();
        let controller = Identity::new("did:example:node");
        let write = store.store(&controller, b"gone-soon").await.unwrap();

        AnchorStore::remove(&store, &controller, &write.anchor_id)
            .await
            .unwrap();
        assert!(AnchorStore::get(&store, &write.anchor_id)
            .await
            .unwrap()
            .is_none());
        AnchorStore::remove(&store, &controller, &write.anchor_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veristamp.db");

        let rec = record(Some("urn:persist:1"));
        {
            let store = SqliteStore::open(&path).unwrap();
            store.put(&rec).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let got = RecordStore::get(&store, &rec.id).await.unwrap().unwrap();
        assert_eq!(got, rec);
    }
}
