use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::job::{Job, JobId, JobStatus, JobTransition};

/// Concurrent in-memory table of prediction jobs.
///
/// Records never leave the store by reference: `create`, `get` and `update`
/// hand back clones taken while the entry's shard lock is held, so readers
/// always see a whole record from before or after an update. Updates to one
/// id are serialized by that lock; unrelated ids only contend when they hash
/// to the same shard.
///
/// Nothing is persisted. Every job is lost when the process exits.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: DashMap<JobId, Job>,
}

/// Per-status job totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct JobCounts {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new pending job under a fresh random id.
    pub fn create(&self) -> Job {
        let now = Utc::now();
        loop {
            let id = Uuid::new_v4();
            // A v4 collision is practically impossible; retry anyway rather
            // than overwrite a live record.
            if let Entry::Vacant(slot) = self.jobs.entry(id) {
                let job = Job::new(id, now);
                slot.insert(job.clone());
                tracing::debug!(job_id = %id, "Created job");
                return job;
            }
        }
    }

    /// Snapshot of the job with `id`.
    pub fn get(&self, id: JobId) -> Result<Job, StoreError> {
        self.jobs
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    /// Apply `transition` to the job atomically and return the new snapshot.
    ///
    /// The store stamps `updated_at`. Transitions that would move a job
    /// backwards or out of a terminal state are rejected and leave the
    /// record unchanged.
    pub fn update(&self, id: JobId, transition: JobTransition) -> Result<Job, StoreError> {
        let mut entry = self.jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let job = entry.value_mut();
        let from = job.status();
        let to = transition.target();

        if !job.apply(transition, Utc::now()) {
            return Err(StoreError::InvalidTransition { id, from, to });
        }

        tracing::debug!(job_id = %id, from = %from, to = %to, "Updated job");
        Ok(job.clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Count jobs per status.
    pub fn counts(&self) -> JobCounts {
        let mut counts = JobCounts::default();
        for entry in self.jobs.iter() {
            match entry.value().status() {
                JobStatus::Pending => counts.pending += 1,
                JobStatus::Processing => counts.processing += 1,
                JobStatus::Completed => counts.completed += 1,
                JobStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Drop terminal jobs created before `cutoff`. Pending and processing
    /// jobs are kept regardless of age. Returns the number removed.
    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.jobs.len();
        self.jobs
            .retain(|_, job| !(job.status().is_terminal() && job.created_at() < cutoff));
        let removed = before.saturating_sub(self.jobs.len());
        if removed > 0 {
            tracing::info!(removed, "Cleaned up old jobs");
        }
        removed
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Job {0} not found")]
    NotFound(JobId),

    #[error("Job {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },
}
