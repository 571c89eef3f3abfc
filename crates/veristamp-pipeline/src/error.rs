//! Error types for the issuance pipeline.

use thiserror::Error;

use veristamp_core::types::RecordId;

use crate::task::TaskId;

/// Errors surfaced by queues, workers, and notifiers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Record store or anchor store failure.
    #[error("store error: {0}")]
    Store(#[from] veristamp_store::StoreError),

    /// Signing backend failure.
    #[error("signer error: {0}")]
    Signer(#[from] veristamp_signer::SignerError),

    /// Canonicalization or proof assembly failure.
    #[error("core error: {0}")]
    Core(#[from] veristamp_core::CoreError),

    /// The queue has no task under this identifier.
    #[error("unknown task: {0}")]
    UnknownTask(TaskId),

    /// A task transition was requested from the wrong state.
    #[error("task {task} is {state}, expected {expected}")]
    InvalidTaskState {
        task: TaskId,
        state: &'static str,
        expected: &'static str,
    },

    /// A claimed task points at a record that no longer exists.
    #[error("record missing for task: {0:?}")]
    RecordMissing(RecordId),

    /// Event publication failure.
    #[error("notify error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
