pub mod executor;
pub mod job_store;
pub mod model;
pub mod predictor;
pub mod preprocessing;
pub mod retention;
