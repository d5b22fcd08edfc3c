use std::path::{Path, PathBuf};

use axum::Router;
use configs::AppConfig;
use service::{storage::TodoStore, todos::TodoService};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::{self, AppState};

/// Build the application from a validated config: open the store and wire the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let data_dir = cfg
        .storage
        .db_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let has_public = common::env::ensure_env(&cfg.web.public_dir, &data_dir).await?;

    let store = TodoStore::open_file(&cfg.storage.db_file).await;
    let state = AppState::new(TodoService::new(store));

    let public_dir: Option<PathBuf> = has_public.then(|| cfg.web.public_dir.clone());
    Ok(routes::build_router(state, routes::build_cors(&cfg.cors), public_dir))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app from `cfg` and run the HTTP server until Ctrl+C.
///
/// Logging and config loading belong to the caller.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, db_file = %cfg.storage.db_file.display(), "starting todo server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
