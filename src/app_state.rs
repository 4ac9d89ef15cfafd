use std::sync::Arc;

use crate::services::executor::JobExecutor;
use crate::services::job_store::JobStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<JobExecutor>,
}

impl AppState {
    pub fn new(executor: JobExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        self.executor.store()
    }
}
