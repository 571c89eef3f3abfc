//! The issuance worker.
//!
//! Drains the task queue: sign the prepared input, assemble the proof
//! object, anchor its canonical bytes, update the record, publish the
//! completion event. Failures are retried until the attempt budget runs
//! out; a permanently failed task leaves its record pending.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use veristamp_core::canonical::canonical_json_bytes;
use veristamp_core::proof::ProofObject;
use veristamp_core::types::ProofId;
use veristamp_signer::ProofSigner;
use veristamp_store::traits::{AnchorStore, RecordStore};

use crate::error::{PipelineError, Result};
use crate::notify::{ProofNotifier, PROOF_CREATED_TOPIC};
use crate::queue::TaskQueue;
use crate::task::IssuanceTask;

/// Worker tuning knobs.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Interval between queue drain passes.
    pub poll_interval: Duration,
    /// Claims allowed per task before it is marked failed.
    pub max_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 3,
        }
    }
}

/// Control messages accepted by a running worker.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Drain the queue now instead of waiting for the next tick.
    Drain,
    /// Stop the loop.
    Shutdown,
}

enum IssueOutcome {
    Issued { proof_id: ProofId },
    /// The record already carries an anchor reference; redelivery of a
    /// settled task, nothing to do.
    AlreadyIssued,
}

/// Background worker that turns pending records into issued proofs.
pub struct IssuanceWorker {
    config: WorkerConfig,
    records: Arc<dyn RecordStore>,
    anchors: Arc<dyn AnchorStore>,
    signer: Arc<dyn ProofSigner>,
    queue: Arc<dyn TaskQueue>,
    notifier: Option<Arc<dyn ProofNotifier>>,
    control_tx: mpsc::Sender<WorkerMessage>,
    control_rx: mpsc::Receiver<WorkerMessage>,
}

impl IssuanceWorker {
    pub fn new(
        config: WorkerConfig,
        records: Arc<dyn RecordStore>,
        anchors: Arc<dyn AnchorStore>,
        signer: Arc<dyn ProofSigner>,
        queue: Arc<dyn TaskQueue>,
        notifier: Option<Arc<dyn ProofNotifier>>,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::channel(16);
        Self {
            config,
            records,
            anchors,
            signer,
            queue,
            notifier,
            control_tx,
            control_rx,
        }
    }

    /// Handle for sending control messages to a running worker.
    pub fn control_handle(&self) -> mpsc::Sender<WorkerMessage> {
        self.control_tx.clone()
    }

    /// Run until shutdown. Every tick drains the queue; control messages
    /// can force an early drain or stop the loop.
    pub async fn run(mut self) {
        info!(
            poll_ms = self.config.poll_interval.as_millis() as u64,
            max_attempts = self.config.max_attempts,
            "starting issuance worker"
        );
        let mut ticker = interval(self.config.poll_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.drain_once().await {
                        error!(error = %e, "drain pass failed");
                    }
                }
                Some(msg) = self.control_rx.recv() => match msg {
                    WorkerMessage::Drain => {
                        if let Err(e) = self.drain_once().await {
                            error!(error = %e, "drain pass failed");
                        }
                    }
                    WorkerMessage::Shutdown => {
                        info!("issuance worker shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Claim and process tasks until nothing is claimable. Returns the
    /// number of claims processed.
    ///
    /// Retries happen within the pass: a retried task becomes claimable
    /// again immediately, so one pass either issues a task's proof or
    /// exhausts its attempt budget. This is the deterministic entry
    /// point; `run` calls it on every tick and tests call it directly.
    pub async fn drain_once(&self) -> Result<usize> {
        let mut processed = 0;
        while let Some(claimed) = self.queue.claim_next().await? {
            processed += 1;
            match self.issue(&claimed.task).await {
                Ok(IssueOutcome::Issued { proof_id }) => {
                    info!(
                        task = %claimed.id,
                        proof = %proof_id,
                        attempt = claimed.attempt,
                        "proof issued"
                    );
                    self.queue.complete(claimed.id).await?;
                }
                Ok(IssueOutcome::AlreadyIssued) => {
                    debug!(task = %claimed.id, "record already issued; settling task");
                    self.queue.complete(claimed.id).await?;
                }
                Err(e) if claimed.attempt < self.config.max_attempts => {
                    warn!(
                        task = %claimed.id,
                        attempt = claimed.attempt,
                        error = %e,
                        "issuance attempt failed; retrying"
                    );
                    self.queue.retry(claimed.id).await?;
                }
                Err(e) => {
                    error!(
                        task = %claimed.id,
                        attempts = claimed.attempt,
                        error = %e,
                        "issuance failed permanently; record stays pending"
                    );
                    self.queue.fail(claimed.id).await?;
                }
            }
        }
        Ok(processed)
    }

    async fn issue(&self, task: &IssuanceTask) -> Result<IssueOutcome> {
        // Re-read the record: a redelivered task for an already issued
        // record must settle without anchoring again.
        let Some(mut record) = self.records.get(&task.record_id).await? else {
            return Err(PipelineError::RecordMissing(task.record_id));
        };
        if record.anchor_reference.is_some() {
            return Ok(IssueOutcome::AlreadyIssued);
        }

        let signature = self
            .signer
            .sign(
                &record.controller_identity,
                &task.verification_method,
                &task.signing_input,
            )
            .await?;
        let signed_at = signature.created;

        // The anchored payload is the signed proof object without a
        // receipt; receipts describe the write and are attached on read.
        let object = ProofObject::from_record(&record).with_signature(signature);
        let payload = canonical_json_bytes(&object.to_value()?)?;
        let write = self
            .anchors
            .store(&record.controller_identity, &payload)
            .await?;

        record.mark_issued(write.anchor_id, signed_at);
        self.records.put(&record).await?;

        let proof_id = ProofId::from_record(record.id);
        if let Some(notifier) = &self.notifier {
            let event = json!({ "id": proof_id.to_string() });
            // Best effort: the proof is already issued, so a publish
            // failure is logged and swallowed.
            if let Err(e) = notifier.publish(PROOF_CREATED_TOPIC, event).await {
                warn!(proof = %proof_id, error = %e, "completion event publish failed");
            }
        }
        Ok(IssueOutcome::Issued { proof_id })
    }
}
