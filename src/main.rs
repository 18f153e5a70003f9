use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use catalog_api::app::{router, AppState};
use catalog_api::config::Settings;
use catalog_api::db::repository::{CatalogRepository, MongoCatalogRepository};

/// Read-only catalog query API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file to load instead of the optional `catalog.*` in the working directory.
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_api=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting catalog API...");

    let settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let addr = settings.bind_address()?;

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&settings.mongodb_uri)
        .await
        .context("Failed to create MongoDB client")?;
    let mongo_db = mongo_client.database(&settings.mongodb_database);
    let catalog_repo: Arc<dyn CatalogRepository> = Arc::new(MongoCatalogRepository::new(
        &mongo_db,
        settings.collections.clone(),
    ));

    tracing::info!(
        database = %settings.mongodb_database,
        brands = %settings.collections.brands,
        items = %settings.collections.items,
        "MongoDB client initialized"
    );

    let app = router(AppState::new(catalog_repo));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
