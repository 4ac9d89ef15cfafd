use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::executor::ExecutorConfig;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory containing `model.json`. The embedded model is used when unset.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Number of background prediction workers.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Maximum number of queued jobs waiting for a worker.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Age after which finished jobs are dropped. Jobs are kept for the
    /// lifetime of the process when unset.
    #[serde(default)]
    pub job_retention_hours: Option<u64>,

    /// How often the retention sweep runs.
    #[serde(default = "default_cleanup_interval_minutes")]
    pub cleanup_interval_minutes: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_worker_count() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_cleanup_interval_minutes() -> u64 {
    60
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("WORKER_COUNT must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("QUEUE_CAPACITY must be at least 1"));
        }
        if self.cleanup_interval_minutes == 0 {
            return Err(ConfigError::Invalid(
                "CLEANUP_INTERVAL_MINUTES must be at least 1",
            ));
        }
        if self.cleanup_interval_minutes.checked_mul(SECS_PER_MINUTE).is_none() {
            return Err(ConfigError::Invalid("CLEANUP_INTERVAL_MINUTES is too large"));
        }
        if let Some(hours) = self.job_retention_hours {
            if hours.checked_mul(SECS_PER_HOUR).is_none() {
                return Err(ConfigError::Invalid("JOB_RETENTION_HOURS is too large"));
            }
        }
        Ok(())
    }

    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig {
            workers: self.worker_count,
            queue_capacity: self.queue_capacity,
        }
    }

    pub fn job_retention(&self) -> Option<Duration> {
        self.job_retention_hours
            .map(|hours| Duration::from_secs(hours.saturating_mul(SECS_PER_HOUR)))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_minutes.saturating_mul(SECS_PER_MINUTE))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
