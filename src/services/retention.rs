use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::services::job_store::JobStore;

/// Periodically drop finished jobs older than `retention`.
pub fn spawn_cleanup(store: Arc<JobStore>, retention: Duration, every: Duration) -> JoinHandle<()> {
    tracing::info!(
        retention_secs = retention.as_secs(),
        interval_secs = every.as_secs(),
        "Job retention sweep enabled"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; nothing is old enough yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep(&store, retention);
        }
    })
}

/// Run a single retention pass. Returns the number of jobs removed.
pub fn sweep(store: &JobStore, retention: Duration) -> usize {
    match chrono::Duration::from_std(retention) {
        Ok(age) => store.purge_older_than(Utc::now() - age),
        Err(e) => {
            tracing::warn!(error = %e, "Retention window out of range, skipping sweep");
            0
        }
    }
}
