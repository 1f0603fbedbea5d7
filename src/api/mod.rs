//! REST surface for the engine
//!
//! Axum HTTP server exposing the engine under `/api/v1`. Every stateful
//! component sits behind one reader-writer lock: mutating handlers hold the
//! write half for the whole mutate-plus-record step, so a command is never
//! pushed out of order relative to the state change it describes; read-only
//! handlers share the read half.
//!
//! Endpoints:
//!   POST /api/v1/tasks
//!   GET  /api/v1/tasks
//!   GET  /api/v1/tasks/top
//!   POST /api/v1/tasks/complete
//!   POST /api/v1/subjects/dependency
//!   GET  /api/v1/subjects/path
//!   GET  /api/v1/subjects
//!   POST /api/v1/logs
//!   GET  /api/v1/logs
//!   GET  /api/v1/logs/summary
//!   POST /api/v1/schedule/block
//!   GET  /api/v1/schedule/blocks
//!   POST /api/v1/schedule/weekly-plan
//!   POST /api/v1/undo
//!   POST /api/v1/redo
//!   GET  /api/v1/health

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::Engine;

/// Shared application state: the engine behind a coarse reader-writer lock
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<Engine>>,
}

impl AppState {
    /// Wraps an engine for sharing across request handlers
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
        }
    }
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route(
            "/api/v1/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/v1/tasks/top", get(handlers::top_task))
        .route("/api/v1/tasks/complete", post(handlers::complete_top))
        .route("/api/v1/subjects", get(handlers::list_subjects))
        .route("/api/v1/subjects/dependency", post(handlers::add_dependency))
        .route("/api/v1/subjects/path", get(handlers::study_path))
        .route(
            "/api/v1/logs",
            get(handlers::list_logs).post(handlers::log_session),
        )
        .route("/api/v1/logs/summary", get(handlers::summary))
        .route("/api/v1/schedule/block", post(handlers::add_block))
        .route("/api/v1/schedule/blocks", get(handlers::list_blocks))
        .route("/api/v1/schedule/weekly-plan", post(handlers::weekly_plan))
        .route("/api/v1/undo", post(handlers::undo))
        .route("/api/v1/redo", post(handlers::redo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds and serves until interrupted
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("studyflow listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => tracing::error!(%err, "failed to listen for shutdown signal"),
    }
}
