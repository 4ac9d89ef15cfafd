use garde::Validate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinError;

use crate::models::job::{Job, JobId, JobStatus, JobTransition};
use crate::models::passenger::PassengerFeatures;
use crate::models::prediction::Prediction;
use crate::services::job_store::{JobStore, StoreError};
use crate::services::predictor::{PredictionError, Predictor};

/// Sizing for the background worker pool.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// Number of worker tasks draining the queue.
    pub workers: usize,
    /// Maximum number of accepted jobs waiting for a worker.
    pub queue_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
        }
    }
}

/// Work item handed from `submit` to the pool.
#[derive(Debug)]
struct QueuedJob {
    job_id: JobId,
    features: PassengerFeatures,
}

/// Result of a synchronous prediction.
#[derive(Debug, Clone, Copy)]
pub struct TimedPrediction {
    pub prediction: Prediction,
    pub elapsed: Duration,
}

/// Runs predictions for queued jobs on a fixed pool of worker tasks.
///
/// `submit` validates the request, reserves a queue slot, records a pending
/// job and returns its id without waiting for the model. Each worker moves a
/// job to `processing`, runs the predictor on the blocking thread pool and
/// finishes with exactly one `completed` or `failed` update, including when
/// the predictor panics.
///
/// Predictions have no timeout and cannot be cancelled. A predictor call that
/// never returns keeps its worker busy for good, so the pool shrinks by one
/// for each such call.
pub struct JobExecutor {
    store: Arc<JobStore>,
    predictor: Arc<dyn Predictor>,
    queue: mpsc::Sender<QueuedJob>,
    config: ExecutorConfig,
    live_workers: Arc<AtomicUsize>,
}

impl JobExecutor {
    /// Spawn the worker pool. Must be called from within a tokio runtime.
    pub fn start(
        store: Arc<JobStore>,
        predictor: Arc<dyn Predictor>,
        config: ExecutorConfig,
    ) -> Self {
        let config = ExecutorConfig {
            workers: config.workers.max(1),
            queue_capacity: config.queue_capacity.max(1),
        };
        let (tx, rx) = mpsc::channel::<QueuedJob>(config.queue_capacity);
        let shared_rx = Arc::new(Mutex::new(rx));
        let live_workers = Arc::new(AtomicUsize::new(0));

        for worker_id in 0..config.workers {
            live_workers.fetch_add(1, Ordering::SeqCst);
            let guard = WorkerGuard(Arc::clone(&live_workers));
            tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&shared_rx),
                Arc::clone(&store),
                Arc::clone(&predictor),
                guard,
            ));
        }

        tracing::info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Prediction worker pool started"
        );

        Self {
            store,
            predictor,
            queue: tx,
            config,
            live_workers,
        }
    }

    /// Accept a prediction request and return the id of its pending job.
    ///
    /// Fails before any job is created when the input is invalid or the
    /// queue is full.
    pub fn submit(&self, features: PassengerFeatures) -> Result<JobId, JobError> {
        validate(&features)?;

        let permit = self.queue.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => JobError::QueueFull,
            TrySendError::Closed(()) => JobError::ShuttingDown,
        })?;

        let job = self.store.create();
        let job_id = job.id();
        permit.send(QueuedJob { job_id, features });

        metrics::counter!("prediction_jobs_submitted_total").increment(1);
        metrics::gauge!("prediction_queue_depth").set(self.queue_depth() as f64);
        tracing::info!(job_id = %job_id, "Prediction job queued");

        Ok(job_id)
    }

    /// Current snapshot of a job.
    pub fn status(&self, job_id: JobId) -> Result<Job, JobError> {
        Ok(self.store.get(job_id)?)
    }

    /// Validate and run a prediction on the caller's behalf, bypassing the queue.
    pub async fn predict_now(&self, features: PassengerFeatures) -> Result<TimedPrediction, JobError> {
        validate(&features)?;

        let start = Instant::now();
        let prediction = run_predictor(Arc::clone(&self.predictor), features).await?;
        let elapsed = start.elapsed();

        metrics::counter!("prediction_sync_requests_total").increment(1);
        metrics::histogram!("prediction_processing_seconds").record(elapsed.as_secs_f64());

        Ok(TimedPrediction { prediction, elapsed })
    }

    /// Jobs accepted but not yet picked up by a worker.
    pub fn queue_depth(&self) -> usize {
        self.queue
            .max_capacity()
            .saturating_sub(self.queue.capacity())
    }

    pub fn live_workers(&self) -> usize {
        self.live_workers.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> ExecutorConfig {
        self.config
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    pub fn predictor_name(&self) -> &str {
        self.predictor.name()
    }
}

fn validate(features: &PassengerFeatures) -> Result<(), JobError> {
    features
        .validate()
        .map_err(|report| JobError::Validation(report.to_string()))
}

/// Decrements the live-worker count when a worker task ends for any reason.
struct WorkerGuard(Arc<AtomicUsize>);

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn run_worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<QueuedJob>>>,
    store: Arc<JobStore>,
    predictor: Arc<dyn Predictor>,
    _guard: WorkerGuard,
) {
    tracing::debug!(worker_id, "Worker ready");

    loop {
        let next = {
            let mut receiver = rx.lock().await;
            let next = receiver.recv().await;
            metrics::gauge!("prediction_queue_depth").set(receiver.len() as f64);
            next
        };

        match next {
            Some(job) => process_job(&store, &predictor, job).await,
            None => break,
        }
    }

    tracing::debug!(worker_id, "Queue closed, worker exiting");
}

/// Drive one job from `pending` to a terminal state.
async fn process_job(store: &JobStore, predictor: &Arc<dyn Predictor>, job: QueuedJob) {
    let QueuedJob { job_id, features } = job;

    if let Err(e) = store.update(job_id, JobTransition::Start) {
        tracing::error!(job_id = %job_id, error = %e, "Failed to mark job as processing");
        return;
    }
    tracing::info!(job_id = %job_id, "Processing prediction job");

    let start = Instant::now();
    let transition = match run_predictor(Arc::clone(predictor), features).await {
        Ok(prediction) => JobTransition::Complete(prediction.into()),
        Err(e) => JobTransition::Fail(e.to_string()),
    };
    let elapsed = start.elapsed();
    metrics::histogram!("prediction_processing_seconds").record(elapsed.as_secs_f64());

    match store.update(job_id, transition) {
        Ok(job) if job.status() == JobStatus::Completed => {
            metrics::counter!("prediction_jobs_completed_total").increment(1);
            tracing::info!(
                job_id = %job_id,
                duration_ms = elapsed.as_millis() as u64,
                label = job.result().map(|r| r.label),
                "Job completed successfully"
            );
        }
        Ok(job) => {
            metrics::counter!("prediction_jobs_failed_total").increment(1);
            tracing::warn!(
                job_id = %job_id,
                error = job.error().unwrap_or_default(),
                "Job failed"
            );
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Failed to record job outcome");
        }
    }
}

/// Run the predictor on the blocking pool, turning panics into errors.
async fn run_predictor(
    predictor: Arc<dyn Predictor>,
    features: PassengerFeatures,
) -> Result<Prediction, PredictionError> {
    tokio::task::spawn_blocking(move || predictor.predict(&features))
        .await
        .unwrap_or_else(|e| Err(PredictionError::Aborted(describe_join_error(e))))
}

fn describe_join_error(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("predictor panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("predictor panicked: {message}")
    } else {
        "predictor panicked".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Invalid prediction request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Prediction queue is full")]
    QueueFull,

    #[error("Prediction workers are shutting down")]
    ShuttingDown,

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictionError),
}
