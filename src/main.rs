use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use titanic_predict::app_state::AppState;
use titanic_predict::config::AppConfig;
use titanic_predict::routes;
use titanic_predict::services::{
    executor::JobExecutor, job_store::JobStore, model::SurvivalModel, predictor::Predictor,
    retention,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env()?;

    tracing::info!("Initializing titanic-predict server");

    let prometheus_handle = routes::metrics::install_recorder()?;

    // Load the classifier
    let model = match &config.model_dir {
        Some(dir) => SurvivalModel::load(dir)?,
        None => {
            tracing::warn!("MODEL_DIR not set, using embedded model");
            SurvivalModel::embedded()?
        }
    };
    tracing::info!(model = %model.version(), "Model loaded");
    let predictor: Arc<dyn Predictor> = Arc::new(model);

    // Job store and worker pool
    let store = Arc::new(JobStore::new());
    let executor = JobExecutor::start(Arc::clone(&store), predictor, config.executor());

    if let Some(retention) = config.job_retention() {
        retention::spawn_cleanup(Arc::clone(&store), retention, config.cleanup_interval());
    }

    let state = AppState::new(executor);
    let app = routes::router(state, prometheus_handle);

    tracing::info!("Starting titanic-predict on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped; in-memory jobs discarded");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
