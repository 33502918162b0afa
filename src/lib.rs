//! Adaptive quiz backend: Bayesian Knowledge Tracing mastery per (student, subtopic),
//! mastery-weighted quiz assembly, and teacher progress reports.

pub mod assembler;
pub mod assignments;
pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod report;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod tracker;
pub mod util;

use std::sync::Arc;

use axum::Router;

pub use crate::routes::build_router;
pub use crate::state::AppState;

/// Router over a shared state, ready to serve.
pub fn create_app(state: AppState) -> Router {
    build_router(Arc::new(state))
}
