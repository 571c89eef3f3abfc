//! Task queue between proof creation and the issuance worker.
//!
//! Creation enqueues; the worker claims, processes, and settles. Claims
//! give per-record mutual exclusion: while one task for a record is
//! running, no other task for that record can be claimed, so a record
//! is never signed or anchored by two workers at once.

use async_trait::async_trait;

use crate::error::Result;
use crate::task::{ClaimedTask, IssuanceTask, TaskId, TaskStatus};

/// At-least-once task dispatch with claim-based exclusion.
///
/// `claim_next` returns the oldest pending task whose record has no
/// running claim. Every claim increments the task's attempt count.
/// A claimed task must be settled with exactly one of `complete`,
/// `retry`, or `fail`; `retry` makes it claimable again.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Add a task. Returns its queue-assigned identifier.
    async fn enqueue(&self, task: IssuanceTask) -> Result<TaskId>;

    /// Claim the oldest claimable task, or `None` if nothing is ready.
    async fn claim_next(&self) -> Result<Option<ClaimedTask>>;

    /// Settle a running task as finished.
    async fn complete(&self, id: TaskId) -> Result<()>;

    /// Return a running task to the pending state for redelivery.
    async fn retry(&self, id: TaskId) -> Result<()>;

    /// Settle a running task as permanently failed.
    async fn fail(&self, id: TaskId) -> Result<()>;

    /// Current status, or `None` for an unknown identifier.
    async fn status(&self, id: TaskId) -> Result<Option<TaskStatus>>;
}

pub mod memory {
    //! In-memory queue for tests and single-process deployments.

    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use veristamp_core::types::RecordId;

    use crate::error::{PipelineError, Result};
    use crate::task::{ClaimedTask, IssuanceTask, TaskId, TaskStatus};

    use super::TaskQueue;

    struct Entry {
        task: IssuanceTask,
        status: TaskStatus,
        attempts: u32,
    }

    /// FIFO claim queue backed by a `BTreeMap`; identifier order is
    /// enqueue order, so iteration yields oldest first.
    pub struct MemoryTaskQueue {
        inner: Mutex<Inner>,
    }

    struct Inner {
        next_id: u64,
        entries: BTreeMap<TaskId, Entry>,
    }

    impl MemoryTaskQueue {
        pub fn new() -> Self {
            Self {
                inner: Mutex::new(Inner {
                    next_id: 1,
                    entries: BTreeMap::new(),
                }),
            }
        }

        /// Number of tasks in any state. Test helper.
        pub fn len(&self) -> usize {
            self.inner.lock().unwrap().entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl Default for MemoryTaskQueue {
        fn default() -> Self {
            Self::new()
        }
    }

    fn settle(inner: &mut Inner, id: TaskId, next: TaskStatus) -> Result<()> {
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or(PipelineError::UnknownTask(id))?;
        if entry.status != TaskStatus::Running {
            return Err(PipelineError::InvalidTaskState {
                task: id,
                state: entry.status.as_str(),
                expected: TaskStatus::Running.as_str(),
            });
        }
        entry.status = next;
        Ok(())
    }

    #[async_trait]
    impl TaskQueue for MemoryTaskQueue {
        async fn enqueue(&self, task: IssuanceTask) -> Result<TaskId> {
            let mut inner = self.inner.lock().unwrap();
            let id = TaskId(inner.next_id);
            inner.next_id += 1;
            inner.entries.insert(
                id,
                Entry {
                    task,
                    status: TaskStatus::Pending,
                    attempts: 0,
                },
            );
            Ok(id)
        }

        async fn claim_next(&self) -> Result<Option<ClaimedTask>> {
            let mut inner = self.inner.lock().unwrap();
            let running: Vec<RecordId> = inner
                .entries
                .values()
                .filter(|e| e.status == TaskStatus::Running)
                .map(|e| e.task.record_id)
                .collect();
            let id = inner
                .entries
                .iter()
                .find(|(_, e)| {
                    e.status == TaskStatus::Pending
                        && !running.contains(&e.task.record_id)
                })
                .map(|(id, _)| *id);
            let Some(id) = id else {
                return Ok(None);
            };
            let entry = inner.entries.get_mut(&id).ok_or(
                // Unreachable: the identifier was found under this lock.
                PipelineError::UnknownTask(id),
            )?;
            entry.status = TaskStatus::Running;
            entry.attempts += 1;
            Ok(Some(ClaimedTask {
                id,
                attempt: entry.attempts,
                task: entry.task.clone(),
            }))
        }

        async fn complete(&self, id: TaskId) -> Result<()> {
            settle(&mut self.inner.lock().unwrap(), id, TaskStatus::Success)
        }

        async fn retry(&self, id: TaskId) -> Result<()> {
            settle(&mut self.inner.lock().unwrap(), id, TaskStatus::Pending)
        }

        async fn fail(&self, id: TaskId) -> Result<()> {
            settle(&mut self.inner.lock().unwrap(), id, TaskStatus::Failed)
        }

        async fn status(&self, id: TaskId) -> Result<Option<TaskStatus>> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .entries
                .get(&id)
                .map(|e| e.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use veristamp_core::types::{Identity, RecordId};

    use super::memory::MemoryTaskQueue;
    use super::*;
    use crate::error::PipelineError;

    fn task_for(record_id: RecordId) -> IssuanceTask {
        IssuanceTask {
            record_id,
            controller_identity: Identity::from("controller-a"),
            verification_method: "controller-a#proof-assertion".to_string(),
            signing_input: vec![0u8; 64],
        }
    }

    #[tokio::test]
    async fn test_claim_is_fifo() {
        let queue = MemoryTaskQueue::new();
        let first = queue.enqueue(task_for(RecordId::generate())).await.unwrap();
        let second = queue.enqueue(task_for(RecordId::generate())).await.unwrap();

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, first);
        assert_eq!(claimed.attempt, 1);

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, second);
    }

    #[tokio::test]
    async fn test_claim_excludes_records_with_running_task() {
        let queue = MemoryTaskQueue::new();
        let record = RecordId::generate();
        let other = RecordId::generate();
        let first = queue.enqueue(task_for(record)).await.unwrap();
        queue.enqueue(task_for(record)).await.unwrap();
        let unrelated = queue.enqueue(task_for(other)).await.unwrap();

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, first);

        // The second task for the same record is skipped while the
        // first is running; the unrelated record is still claimable.
        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, unrelated);
        assert!(queue.claim_next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_releases_the_record() {
        let queue = MemoryTaskQueue::new();
        let record = RecordId::generate();
        let first = queue.enqueue(task_for(record)).await.unwrap();
        let second = queue.enqueue(task_for(record)).await.unwrap();

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, first);
        queue.complete(first).await.unwrap();

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, second);
        assert_eq!(queue.status(first).await.unwrap(), Some(TaskStatus::Success));
    }

    #[tokio::test]
    async fn test_retry_redelivers_with_higher_attempt() {
        let queue = MemoryTaskQueue::new();
        let id = queue.enqueue(task_for(RecordId::generate())).await.unwrap();

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.attempt, 1);
        queue.retry(id).await.unwrap();
        assert_eq!(queue.status(id).await.unwrap(), Some(TaskStatus::Pending));

        let claimed = queue.claim_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, id);
        assert_eq!(claimed.attempt, 2);
    }

    #[tokio::test]
    async fn test_failed_task_is_not_redelivered() {
        let queue = MemoryTaskQueue::new();
        let id = queue.enqueue(task_for(RecordId::generate())).await.unwrap();

        queue.claim_next().await.unwrap().unwrap();
        queue.fail(id).await.unwrap();

        assert!(queue.claim_next().await.unwrap().is_none());
        assert_eq!(queue.status(id).await.unwrap(), Some(TaskStatus::Failed));
    }

    #[tokio::test]
    async fn test_settle_requires_running_state() {
        let queue = MemoryTaskQueue::new();
        let id = queue.enqueue(task_for(RecordId::generate())).await.unwrap();

        let err = queue.complete(id).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidTaskState { .. }));

        let err = queue.complete(TaskId(999)).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnknownTask(TaskId(999))));
    }

    #[tokio::test]
    async fn test_status_unknown_task_is_none() {
        let queue = MemoryTaskQueue::new();
        assert_eq!(queue.status(TaskId(5)).await.unwrap(), None);
    }
}
