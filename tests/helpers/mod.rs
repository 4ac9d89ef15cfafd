//! Test helper utilities for driving the router in-process
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tower::ServiceExt;

use titanic_predict::app_state::AppState;
use titanic_predict::models::passenger::PassengerFeatures;
use titanic_predict::models::prediction::Prediction;
use titanic_predict::services::executor::{ExecutorConfig, JobExecutor};
use titanic_predict::services::job_store::JobStore;
use titanic_predict::services::model::SurvivalModel;
use titanic_predict::services::predictor::{PredictionError, Predictor};
use titanic_predict::routes;

/// Predictor whose behaviour is chosen by the passenger's `name`:
/// `"error"` fails, `"panic"` panics, anything else survives.
pub struct ScriptedPredictor;

impl Predictor for ScriptedPredictor {
    fn predict(&self, features: &PassengerFeatures) -> Result<Prediction, PredictionError> {
        match features.name.as_deref() {
            Some("error") => Err(PredictionError::InvalidFeatures(
                "feature vector rejected by model".to_string(),
            )),
            Some("panic") => panic!("model crashed"),
            _ => Ok(Prediction {
                label: 1,
                probability: 0.75,
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Router backed by the embedded survival model.
pub fn build_test_app() -> (Router, AppState) {
    let model = SurvivalModel::embedded().expect("embedded model loads");
    build_test_app_with(Arc::new(model), ExecutorConfig::default())
}

/// Router backed by an arbitrary predictor, with the production middleware stack.
pub fn build_test_app_with(
    predictor: Arc<dyn Predictor>,
    config: ExecutorConfig,
) -> (Router, AppState) {
    let store = Arc::new(JobStore::new());
    let executor = JobExecutor::start(store, predictor, config);
    let state = AppState::new(executor);

    // Rendered through a local recorder; tests never install a global one.
    let prometheus = Arc::new(PrometheusBuilder::new().build_recorder().handle());

    (routes::router(state.clone(), prometheus), state)
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: impl Into<String>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Submit a payload to `/predict-async` and return the issued job id.
pub async fn submit(app: &Router, payload: &Value) -> String {
    let response = post_json(app, "/predict-async", payload).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    json["job_id"]
        .as_str()
        .expect("job_id is a string")
        .to_string()
}

/// Poll `/jobs/{id}` until the job is completed or failed.
pub async fn poll_job_status(app: &Router, job_id: &str, timeout: Duration) -> Value {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let response = get(app, &format!("/jobs/{job_id}")).await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "job {job_id} should stay resolvable while polling"
        );
        let job = body_json(response).await;

        match job["status"].as_str() {
            Some("completed") | Some("failed") => return job,
            Some("pending") | Some("processing") => {}
            other => panic!("Unknown job status: {other:?}"),
        }

        if tokio::time::Instant::now() >= deadline {
            panic!("Job {job_id} did not finish within {timeout:?}");
        }
        sleep(Duration::from_millis(10)).await;
    }
}

/// Wait for a job with the default timeout.
pub async fn wait_for_job_completion(app: &Router, job_id: &str) -> Value {
    poll_job_status(app, job_id, Duration::from_secs(10)).await
}
