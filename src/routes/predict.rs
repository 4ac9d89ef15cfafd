use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::models::job::Job;
use crate::models::passenger::PassengerFeatures;
use crate::models::prediction::{AsyncPredictionResponse, SyncPredictionResponse};
use crate::routes::error::{AppError, AppResult};

/// POST /predict-sync: run the classifier and return its answer.
pub async fn predict_sync(
    State(state): State<AppState>,
    payload: Result<Json<PassengerFeatures>, JsonRejection>,
) -> AppResult<Json<SyncPredictionResponse>> {
    let Json(features) = payload?;
    let timed = state.executor.predict_now(features).await?;

    Ok(Json(SyncPredictionResponse {
        label: timed.prediction.label,
        probability: timed.prediction.probability,
        processing_time: round_millis(timed.elapsed.as_secs_f64()),
    }))
}

/// POST /predict-async: queue a prediction and return its job id.
pub async fn predict_async(
    State(state): State<AppState>,
    payload: Result<Json<PassengerFeatures>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AsyncPredictionResponse>)> {
    let Json(features) = payload?;
    let job_id = state.executor.submit(features)?;

    Ok((StatusCode::ACCEPTED, Json(AsyncPredictionResponse { job_id })))
}

/// GET /jobs/{job_id}: current state of a queued prediction.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<Job>> {
    let id = Uuid::parse_str(&job_id).map_err(|_| AppError::UnknownJob(job_id))?;
    let job = state.executor.status(id)?;
    Ok(Json(job))
}

fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
