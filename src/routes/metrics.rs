use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;

/// Install the global Prometheus recorder and describe the service's metrics.
pub fn install_recorder() -> Result<Arc<PrometheusHandle>, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_histogram!(
        "prediction_processing_seconds",
        "Time spent in the classifier per prediction"
    );
    metrics::describe_counter!(
        "prediction_jobs_submitted_total",
        "Total async prediction jobs accepted"
    );
    metrics::describe_counter!(
        "prediction_jobs_completed_total",
        "Total async prediction jobs completed"
    );
    metrics::describe_counter!(
        "prediction_jobs_failed_total",
        "Total async prediction jobs that failed"
    );
    metrics::describe_counter!(
        "prediction_sync_requests_total",
        "Total synchronous predictions served"
    );
    metrics::describe_gauge!(
        "prediction_queue_depth",
        "Jobs waiting for a prediction worker"
    );

    Ok(Arc::new(handle))
}

/// GET /metrics: Prometheus text exposition.
pub async fn prometheus_metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    handle.render()
}
