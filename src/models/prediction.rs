use serde::{Deserialize, Serialize};

use crate::models::job::JobId;

/// Output of the survival classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    /// 1 = survived, 0 = did not survive.
    pub label: u8,
    /// Probability of survival, in `[0, 1]`.
    pub probability: f64,
}

/// Response from `POST /predict-sync`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncPredictionResponse {
    pub label: u8,
    pub probability: f64,
    /// Wall time spent in the classifier, in seconds.
    pub processing_time: f64,
}

/// Response after queueing an async prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct AsyncPredictionResponse {
    pub job_id: JobId,
}
