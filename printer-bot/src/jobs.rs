//! In-memory print job store: monotonic ids, state transitions, history listing.
//!
//! All access goes through one mutex so concurrent update tasks cannot duplicate
//! ids or lose transitions. Jobs are retained after completion for `/completed`.

use chrono::Utc;
use printbot_core::{JobError, JobState, PrintJob};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::info;

/// Most-recent completed jobs returned by [`JobStore::list_completed`].
const COMPLETED_HISTORY_LIMIT: usize = 10;

struct Inner {
    next_id: u64,
    jobs: BTreeMap<u64, PrintJob>,
}

/// Record of print jobs, their state, and ordering.
pub struct JobStore {
    inner: Mutex<Inner>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                jobs: BTreeMap::new(),
            }),
        }
    }

    /// Creates a job in `pending` with a fresh id.
    pub async fn submit(&self, chat_id: i64, file_name: &str) -> PrintJob {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let job = PrintJob {
            id,
            chat_id,
            file_name: file_name.to_string(),
            state: JobState::Pending,
            error: None,
            submitted_at: Utc::now(),
            completed_at: None,
        };
        inner.jobs.insert(id, job.clone());
        info!(job_id = id, chat_id, file_name, "Job submitted");
        job
    }

    /// Jobs in the given state, ascending by submission order.
    pub async fn list(&self, state: JobState) -> Vec<PrintJob> {
        let inner = self.inner.lock().await;
        inner
            .jobs
            .values()
            .filter(|j| j.state == state)
            .cloned()
            .collect()
    }

    /// Last completed jobs, most recent first, capped at 10.
    pub async fn list_completed(&self) -> Vec<PrintJob> {
        let inner = self.inner.lock().await;
        let mut done: Vec<PrintJob> = inner
            .jobs
            .values()
            .filter(|j| j.state == JobState::Completed)
            .cloned()
            .collect();
        done.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then(b.id.cmp(&a.id))
        });
        done.truncate(COMPLETED_HISTORY_LIMIT);
        done
    }

    pub async fn get(&self, id: u64) -> Option<PrintJob> {
        self.inner.lock().await.jobs.get(&id).cloned()
    }

    /// Cancels a pending job owned by `chat_id`.
    pub async fn cancel(&self, id: u64, chat_id: i64) -> Result<PrintJob, JobError> {
        let mut inner = self.inner.lock().await;
        let job = inner.jobs.get_mut(&id).ok_or(JobError::NotFound(id))?;
        if job.chat_id != chat_id {
            return Err(JobError::Forbidden(id));
        }
        if job.state != JobState::Pending {
            return Err(JobError::InvalidState {
                id,
                state: job.state,
            });
        }
        job.state = JobState::Cancelled;
        info!(job_id = id, chat_id, "Job cancelled");
        Ok(job.clone())
    }

    /// Atomic pending → printing; the dispatcher calls this before invoking the spooler.
    /// A job cancelled in the meantime is rejected here.
    pub async fn begin_printing(&self, id: u64) -> Result<(), JobError> {
        let mut inner = self.inner.lock().await;
        let job = inner.jobs.get_mut(&id).ok_or(JobError::NotFound(id))?;
        if job.state != JobState::Pending {
            return Err(JobError::InvalidState {
                id,
                state: job.state,
            });
        }
        job.state = JobState::Printing;
        Ok(())
    }

    /// printing → completed, recording the completion time. Dispatcher only.
    pub async fn complete(&self, id: u64) -> Result<PrintJob, JobError> {
        let mut inner = self.inner.lock().await;
        let job = inner.jobs.get_mut(&id).ok_or(JobError::NotFound(id))?;
        if job.state != JobState::Printing {
            return Err(JobError::InvalidState {
                id,
                state: job.state,
            });
        }
        job.state = JobState::Completed;
        job.completed_at = Some(Utc::now());
        Ok(job.clone())
    }

    /// pending/printing → failed, recording the captured error output. Dispatcher only.
    pub async fn fail(&self, id: u64, error: &str) -> Result<PrintJob, JobError> {
        let mut inner = self.inner.lock().await;
        let job = inner.jobs.get_mut(&id).ok_or(JobError::NotFound(id))?;
        if job.state.is_terminal() {
            return Err(JobError::InvalidState {
                id,
                state: job.state,
            });
        }
        job.state = JobState::Failed;
        job.error = Some(error.to_string());
        Ok(job.clone())
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
