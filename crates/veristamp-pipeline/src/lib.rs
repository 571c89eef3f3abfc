//! Asynchronous issuance pipeline for veristamp.
//!
//! Proof creation is synchronous and cheap; signing and anchoring are
//! not. This crate carries the deferred half of issuance: a claim-based
//! task queue, the worker that drains it, and the completion events it
//! publishes.
//!
//! ## Key Types
//!
//! - [`IssuanceTask`]: work order carrying a record id and its prepared
//!   signing input.
//! - [`TaskQueue`]: at-least-once dispatch with per-record exclusion.
//! - [`IssuanceWorker`]: signs, anchors, updates the record, notifies.
//! - [`ProofNotifier`]: best-effort completion event hook.

pub mod error;
pub mod notify;
pub mod queue;
pub mod task;
pub mod worker;

pub use error::{PipelineError, Result};
pub use notify::{MemoryNotifier, NullNotifier, ProofNotifier, PROOF_CREATED_TOPIC};
pub use queue::{memory::MemoryTaskQueue, TaskQueue};
pub use task::{ClaimedTask, IssuanceTask, TaskId, TaskStatus};
pub use worker::{IssuanceWorker, WorkerConfig, WorkerMessage};
