// Main entry point for the walk-in interview API server

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walk_in_core::kernel::{BaseDocumentStore, MemoryDocumentStore, PostgresDocumentStore};
use walk_in_core::{server::build_app, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,walk_in_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Walk-in Interview API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database (migrations run on connect)
    let store: Arc<dyn BaseDocumentStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let store =
                PostgresDocumentStore::connect(database_url, config.database_max_connections)
                    .await?;
            tracing::info!("Database connected, migrations complete");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; job posts are kept in memory only");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // Build application
    let app = build_app(store, &config);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
