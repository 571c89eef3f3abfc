//! Issuance tasks.
//!
//! A task carries everything the worker needs to finish issuing one
//! proof: the record to update, the signing input prepared at creation
//! time, and the verification method to sign under. The caller's
//! document never enters the queue; only its digests do.

use std::fmt;

use serde::{Deserialize, Serialize};

use veristamp_core::types::{Identity, RecordId};

// ─────────────────────────────────────────────
// Identifiers and states
// ─────────────────────────────────────────────

/// Queue-assigned task identifier. Monotonic per queue, so ordering by
/// identifier is enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Lifecycle of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting to be claimed.
    Pending,
    /// Claimed by a worker.
    Running,
    /// Finished; the record was updated (or needed no update).
    Success,
    /// Attempt budget exhausted; the record stays pending.
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        }
    }
}

// ─────────────────────────────────────────────
// Task payload
// ─────────────────────────────────────────────

/// Work order for the issuance worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuanceTask {
    /// Record to sign and anchor.
    pub record_id: RecordId,
    /// Controller whose key signs the proof.
    pub controller_identity: Identity,
    /// Verification method named in the emitted signature.
    pub verification_method: String,
    /// Pre-computed signing input (salted digest pair).
    pub signing_input: Vec<u8>,
}

/// A task handed to a worker by [`claim_next`], with its attempt count.
///
/// `attempt` counts this claim: 1 on first delivery, incremented on
/// each redelivery after a retry.
///
/// [`claim_next`]: crate::queue::TaskQueue::claim_next
#[derive(Debug, Clone)]
pub struct ClaimedTask {
    pub id: TaskId,
    pub attempt: u32,
    pub task: IssuanceTask,
}
