use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::models::prediction::Prediction;

pub type JobId = Uuid;

/// Status of a prediction job in the async queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and failed jobs accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Outcome stored on a completed job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct JobResult {
    pub label: u8,
    pub probability: f64,
}

impl From<Prediction> for JobResult {
    fn from(prediction: Prediction) -> Self {
        Self {
            label: prediction.label,
            probability: prediction.probability,
        }
    }
}

/// A queued prediction job.
///
/// Fields are private so a record can only change through
/// [`Job::apply`], which keeps `result`/`error` consistent with `status`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Job {
    id: JobId,
    status: JobStatus,
    result: Option<JobResult>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A state change requested by the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum JobTransition {
    Start,
    Complete(JobResult),
    Fail(String),
}

impl JobTransition {
    pub fn target(&self) -> JobStatus {
        match self {
            JobTransition::Start => JobStatus::Processing,
            JobTransition::Complete(_) => JobStatus::Completed,
            JobTransition::Fail(_) => JobStatus::Failed,
        }
    }
}

impl Job {
    pub fn new(id: JobId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `transition` is a legal forward step from the current status.
    pub fn can_apply(&self, transition: &JobTransition) -> bool {
        matches!(
            (self.status, transition),
            (JobStatus::Pending, JobTransition::Start)
                | (JobStatus::Processing, JobTransition::Complete(_))
                | (JobStatus::Processing, JobTransition::Fail(_))
        )
    }

    /// Apply a transition in place. Returns `false` and leaves the record
    /// untouched when the step is not allowed.
    pub fn apply(&mut self, transition: JobTransition, now: DateTime<Utc>) -> bool {
        if !self.can_apply(&transition) {
            return false;
        }

        self.status = transition.target();
        match transition {
            JobTransition::Start => {}
            JobTransition::Complete(result) => {
                self.result = Some(result);
                self.error = None;
            }
            JobTransition::Fail(message) => {
                self.result = None;
                self.error = Some(message);
            }
        }
        // Wall clock can step backwards; timestamps must not.
        self.updated_at = now.max(self.updated_at);
        true
    }
}
