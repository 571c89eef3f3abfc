//! # veristamp-store
//!
//! Storage for the veristamp proof engine. Two concerns live behind traits
//! here: the proof-record index ([`RecordStore`]) and the durable,
//! content-addressed anchor store ([`AnchorStore`]).
//!
//! ## Key Types
//!
//! - [`RecordStore`] / [`AnchorStore`] - The async storage traits
//! - [`SqliteStore`] - SQLite backend implementing both traits in one file
//! - [`MemoryRecordStore`] / [`MemoryAnchorStore`] - In-memory backends
//! - [`StoredAnchor`] / [`AnchorWrite`] - Anchor payloads and write outcomes
//!
//! ## Design Notes
//!
//! - **Upsert writes**: `put` replaces by record id; mutations are
//!   single-record read-modify-write at the caller.
//! - **Content-addressed anchors**: writing identical bytes twice yields the
//!   same anchor id and keeps the original receipt.
//! - **Misses are not errors**: `get` returns `Ok(None)` for unknown ids and
//!   `remove` of an unknown id succeeds.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryAnchorStore, MemoryRecordStore, MEMORY_RECEIPT_TYPE};
pub use sqlite::{SqliteStore, SQLITE_RECEIPT_TYPE};
pub use traits::{content_address, AnchorStore, AnchorWrite, RecordStore, StoredAnchor};
