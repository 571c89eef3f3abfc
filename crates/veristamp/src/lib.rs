//! # Veristamp
//!
//! Content-integrity proofs: tamper-evident, independently verifiable
//! assertions that an exact piece of content existed, tied to an
//! identity, without storing the content itself.
//!
//! ## Overview
//!
//! - **Fingerprint**: a self-describing digest of the canonicalized
//!   document; the document itself is discarded after hashing.
//! - **Record**: the only persisted entity; pending until signed and
//!   anchored, issued once its anchor reference is set.
//! - **Issuance**: asynchronous; `create` returns before signing starts
//!   and a background worker finishes the proof.
//! - **Verification**: a fixed-priority classification, never an
//!   exception for "not issued" or "signature invalid."
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use veristamp::core::proof::{ASSERTION_METHOD_ID, PROOF_HASH_KEY_ID};
//! use veristamp::pipeline::{IssuanceWorker, MemoryTaskQueue, WorkerConfig};
//! use veristamp::signer::{Ed25519Signer, KeySecret, MemoryKeySource};
//! use veristamp::store::{MemoryAnchorStore, MemoryRecordStore};
//! use veristamp::{Identity, ProofService};
//!
//! async fn example() {
//!     let records = Arc::new(MemoryRecordStore::new());
//!     let anchors = Arc::new(MemoryAnchorStore::new());
//!     let keys = Arc::new(MemoryKeySource::new());
//!     let queue = Arc::new(MemoryTaskQueue::new());
//!
//!     let controller = Identity::from("did:example:node1");
//!     keys.insert(&controller, ASSERTION_METHOD_ID, KeySecret::generate());
//!     keys.insert(&controller, PROOF_HASH_KEY_ID, KeySecret::generate());
//!
//!     let signer = Arc::new(Ed25519Signer::new(keys.clone()));
//!     let service = ProofService::new(
//!         records.clone(),
//!         anchors.clone(),
//!         keys.clone(),
//!         signer.clone(),
//!         queue.clone(),
//!     );
//!
//!     // Request a proof; the document is fingerprinted and dropped.
//!     let document = serde_json::json!({"type": "Person", "id": "123"});
//!     let proof_id = service
//!         .create(&document, Identity::from("did:example:user1"), controller)
//!         .await
//!         .unwrap();
//!
//!     // A worker finishes issuance in the background. Here we drain
//!     // the queue inline instead of spawning `worker.run()`.
//!     let worker = IssuanceWorker::new(
//!         WorkerConfig::default(),
//!         records,
//!         anchors,
//!         signer,
//!         queue,
//!         None,
//!     );
//!     worker.drain_once().await.unwrap();
//!
//!     let outcome = service.verify(&proof_id.to_string()).await.unwrap();
//!     assert!(outcome.verified);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `veristamp::core` - Canonicalization, fingerprints, records, proofs
//! - `veristamp::store` - Record and anchor storage (SQLite, memory)
//! - `veristamp::signer` - Key sources and the Ed25519 signing primitive
//! - `veristamp::pipeline` - Task queue, issuance worker, notifications

pub mod error;
pub mod service;

// Re-export component crates
pub use veristamp_core as core;
pub use veristamp_pipeline as pipeline;
pub use veristamp_signer as signer;
pub use veristamp_store as store;

// Re-export main types for convenience
pub use error::{Result, ServiceError};
pub use service::{anchored_payload, verification_method, ProofService};

// Re-export commonly used core types
pub use veristamp_core::{
    AnchorId, Fingerprint, Identity, ProofId, ProofObject, ProofRecord, ProofStatus,
    VerifyFailure, VerifyOutcome,
};
