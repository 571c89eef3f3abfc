//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a fully wired proof stack
//! over in-memory backends, with the worker drained inline so issuance
//! is deterministic.

use std::sync::Arc;

use serde_json::{json, Value};

use veristamp::{Identity, ProofId, ProofService};
use veristamp_core::proof::{ASSERTION_METHOD_ID, PROOF_HASH_KEY_ID};
use veristamp_pipeline::{IssuanceWorker, MemoryNotifier, MemoryTaskQueue, WorkerConfig};
use veristamp_signer::{Ed25519Signer, KeySecret, MemoryKeySource};
use veristamp_store::{MemoryAnchorStore, MemoryRecordStore};

/// A wired proof stack with one seeded controller.
pub struct ProofFixture {
    pub service: ProofService,
    pub records: Arc<MemoryRecordStore>,
    pub anchors: Arc<MemoryAnchorStore>,
    pub keys: Arc<MemoryKeySource>,
    pub queue: Arc<MemoryTaskQueue>,
    pub notifier: Arc<MemoryNotifier>,
    pub worker: IssuanceWorker,
    pub controller: Identity,
}

impl ProofFixture {
    /// Wire a stack with the default test controller.
    pub fn new() -> Self {
        Self::with_controller(Identity::from("did:test:node"))
    }

    /// Wire a stack and seed key material for `controller`.
    pub fn with_controller(controller: Identity) -> Self {
        let records = Arc::new(MemoryRecordStore::new());
        let anchors = Arc::new(MemoryAnchorStore::new());
        let keys = Arc::new(MemoryKeySource::new());
        let queue = Arc::new(MemoryTaskQueue::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let signer = Arc::new(Ed25519Signer::new(keys.clone()));

        let service = ProofService::new(
            records.clone(),
            anchors.clone(),
            keys.clone(),
            signer.clone(),
            queue.clone(),
        );
        let worker = IssuanceWorker::new(
            WorkerConfig::default(),
            records.clone(),
            anchors.clone(),
            signer,
            queue.clone(),
            Some(notifier.clone()),
        );

        let fixture = Self {
            service,
            records,
            anchors,
            keys,
            queue,
            notifier,
            worker,
            controller: controller.clone(),
        };
        fixture.seed_controller(&controller);
        fixture
    }

    /// Seed assertion and hashing key material for a controller.
    pub fn seed_controller(&self, controller: &Identity) {
        self.keys.insert(controller, ASSERTION_METHOD_ID, KeySecret::generate());
        self.keys.insert(controller, PROOF_HASH_KEY_ID, KeySecret::generate());
    }

    /// Request a proof and leave it pending.
    pub async fn create_pending(&self, document: &Value, owner: &str) -> ProofId {
        self.service
            .create(document, Identity::from(owner), self.controller.clone())
            .await
            .expect("create")
    }

    /// Request a proof and drain the worker until it is issued.
    pub async fn issue(&self, document: &Value, owner: &str) -> ProofId {
        let id = self.create_pending(document, owner).await;
        self.worker.drain_once().await.expect("drain");
        id
    }
}

impl Default for ProofFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A document with a subject id, shaped like typical caller input.
pub fn person_document(id: &str, name: &str) -> Value {
    json!({"type": "Person", "id": id, "name": name})
}

/// Deterministic key material for reproducible scenarios.
pub fn seeded_secret(seed: u8) -> KeySecret {
    KeySecret::from_bytes([seed; 32])
}
