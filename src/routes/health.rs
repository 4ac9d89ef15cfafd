use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app_state::AppState;
use crate::services::job_store::JobCounts;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub model: ModelHealth,
    pub workers: WorkerHealth,
}

#[derive(Serialize)]
pub struct ModelHealth {
    pub status: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct WorkerHealth {
    pub status: String,
    pub live: usize,
    pub configured: usize,
    pub queue_capacity: usize,
    pub queue_depth: usize,
    pub jobs: JobCounts,
}

/// GET /: liveness banner.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Titanic Prediction Service is running!".to_string(),
    })
}

/// GET /health: model and worker pool status.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let executor = &state.executor;
    let config = executor.config();
    let live = executor.live_workers();
    let queue_depth = executor.queue_depth();

    let workers_ok = live > 0;
    let status_code = if workers_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if workers_ok {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            model: ModelHealth {
                status: "ok".to_string(),
                name: executor.predictor_name().to_string(),
            },
            workers: WorkerHealth {
                status: if workers_ok { "ok" } else { "error" }.to_string(),
                live,
                configured: config.workers,
                queue_capacity: config.queue_capacity,
                queue_depth,
                jobs: state.store().counts(),
            },
        },
    };

    (status_code, Json(response))
}
