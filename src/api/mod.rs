//! HTTP API for submitting generation jobs.
//!
//! ## Endpoints
//!
//! - `POST /analyze` - Generate code for every operation of an API description
//! - `GET /api/health` - Health check

mod routes;
pub mod types;

pub use routes::{router, AppState};

use crate::config::Config;

/// Bind `host:port` from the config and serve until the process exits.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is listening on {}", addr);

    axum::serve(listener, router(config)).await?;
    Ok(())
}
