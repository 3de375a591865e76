//! crudgen - HTTP Server Entry Point
//!
//! Starts the HTTP server that accepts generation jobs.

use crudgen::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the real environment still applies.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crudgen=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        model = %config.default_model,
        output_dir = %config.output_dir.display(),
        rounds = ?config.round_limit,
        "Loaded configuration"
    );

    api::serve(config).await?;

    Ok(())
}
