use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use packforge_infra::{AppConfig, InventoryStore, JsonFileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = AppConfig::path_from_env();
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    packforge_observability::init(config.log_format);
    info!(name = %config.name, version = ?config.version, "starting");

    let storage = JsonFileStore::new(&config.storage_path);
    let (store, persist_worker) = InventoryStore::open(storage).with_context(|| {
        format!(
            "failed to load inventory from {}",
            config.storage_path.display()
        )
    })?;
    info!(items = store.len(), "inventory loaded");

    let app = packforge_api::app::build_app(Arc::new(store), &config.route_prefix());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutting down; flushing inventory");
    tokio::task::spawn_blocking(move || persist_worker.shutdown())
        .await
        .context("persist worker panicked")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
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
}
