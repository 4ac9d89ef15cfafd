//! Titanic survival prediction service
//!
//! Serves a pretrained survival classifier over HTTP, either synchronously or
//! through an in-memory job queue that callers poll for results.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
