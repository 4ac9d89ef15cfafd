use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::services::executor::JobError;
use crate::services::job_store::StoreError;

/// Error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce `{"error", "code"}` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Job(#[from] JobError),

    /// Request body could not be read as passenger features.
    #[error(transparent)]
    Payload(#[from] JsonRejection),

    /// A job id that does not parse, and therefore was never issued.
    #[error("Job {0} not found")]
    UnknownJob(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Job(err) => classify_job_error(err),
            AppError::Payload(rejection) => {
                let status = rejection.status();
                let code = if status == StatusCode::UNPROCESSABLE_ENTITY {
                    "VALIDATION_ERROR"
                } else {
                    "BAD_REQUEST"
                };
                (status, code, rejection.body_text())
            }
            AppError::UnknownJob(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_job_error(err: &JobError) -> (StatusCode, &'static str, String) {
    match err {
        JobError::Validation(msg) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            msg.clone(),
        ),
        JobError::Store(StoreError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        JobError::QueueFull | JobError::ShuttingDown => {
            tracing::warn!(error = %err, "Rejecting prediction job");
            (StatusCode::SERVICE_UNAVAILABLE, "QUEUE_UNAVAILABLE", err.to_string())
        }
        JobError::Prediction(_) => {
            tracing::error!(error = %err, "Synchronous prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PREDICTION_ERROR",
                err.to_string(),
            )
        }
        JobError::Store(StoreError::InvalidTransition { .. }) => {
            tracing::error!(error = %err, "Unexpected job transition");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
