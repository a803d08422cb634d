use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::api;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::storage::{LoroBackend, LoroStore, MongoStore, Repository};

/// Install the stderr log subscriber. `RUST_LOG` overrides the default `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Serve the API against MongoDB. Missing credentials or an unreachable
/// database are fatal.
pub fn handle_serve(port: Option<u16>) -> Result<()> {
    let config = ServerConfig::from_env()?;
    let port = port.unwrap_or(config.port);

    runtime()?.block_on(async {
        tracing::info!(
            uri = %config.sanitized_uri(),
            source = ?config.credential_source,
            "Connecting to MongoDB"
        );
        let store = MongoStore::connect(&config.mongo_uri).await?;
        serve(Repository::new(Arc::new(store)), port).await
    })
}

/// Serve the API against the document file in `data_dir`.
pub fn handle_serve_local(data_dir: PathBuf, port: u16) -> Result<()> {
    runtime()?.block_on(async {
        let store = LoroStore::open_or_init(&data_dir)?;
        tracing::info!(
            path = %store.path().unwrap_or(Path::new("")).display(),
            "Using local document store"
        );
        serve(Repository::new(Arc::new(LoroBackend::new(store))), port).await
    })
}

/// Bind and run until Ctrl-C.
pub async fn serve(repo: Repository, port: u16) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        backend = repo.backend_name(),
        "Server running on port {}",
        port
    );

    axum::serve(listener, api::router(repo))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
