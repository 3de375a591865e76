//! Route table and handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::types::{AnalyzeRequest, AnalyzeResponse, HealthResponse};
use crate::agent::Orchestrator;
use crate::config::Config;
use crate::description::{fetch_description, SourceError};

/// Shared server state.
pub struct AppState {
    pub config: Config,
}

pub fn router(config: Config) -> Router {
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/analyze", post(analyze))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /analyze - Fetch a description and generate code for all of it.
///
/// Responds only after every task has run. Per-task failures are logged,
/// not reported; only an unusable description fails the request.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let description = fetch_description(&req.swagger_uri).await.map_err(|e| {
        tracing::warn!(source = %req.swagger_uri, error = %e, "Rejecting generation job");
        (source_error_status(&e), e.to_string())
    })?;

    // A fresh orchestrator per job, so jobs never share a tool registry.
    let orchestrator = Orchestrator::from_config(&state.config);
    let query = req.query;

    // Detached so a dropped connection cannot cancel a job mid-flight.
    let job = tokio::spawn(async move { orchestrator.run(&description, &query).await });
    let summary = job.await.map_err(|e| {
        tracing::error!(error = %e, "Generation job aborted");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Generation job aborted: {}", e),
        )
    })?;
    tracing::info!(summary = ?summary, "Job acknowledged");

    Ok(Json(AnalyzeResponse::done()))
}

fn source_error_status(error: &SourceError) -> StatusCode {
    match error {
        SourceError::Http(_) => StatusCode::BAD_GATEWAY,
        SourceError::Read { .. } => StatusCode::NOT_FOUND,
        SourceError::Parse(_) | SourceError::Shape(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
