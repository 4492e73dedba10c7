//! Record store HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, and the HTTP router, then serves the API
//! alongside the Prometheus metrics listener.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use anyhow::Context;
use roster_api::app::{AppState, build_router};
use roster_api::config::{ApiConfig, StorageBackend};
use roster_api::observability;
use roster_api::store::memory::InMemoryStore;
use roster_api::store::sqlite::SqliteStore;
use roster_api::store::{PeopleStore, StoreConfig};
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env_or_yaml().context("roster api config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("roster-api")?;
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state.clone());
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(
        %addr,
        backend = state.store.backend_name(),
        "roster api listening"
    );
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {
            tracing::info!("shutdown requested");
        }
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &ApiConfig) -> anyhow::Result<AppState> {
    let store_config = StoreConfig::default();
    let store: Arc<dyn PeopleStore + Send + Sync> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new(store_config)),
        StorageBackend::Sqlite => Arc::new(
            SqliteStore::connect(&config.sqlite, store_config)
                .await
                .context("open sqlite store")?,
        ),
    };
    Ok(AppState::new(store, config.allowed_origins.clone()))
}
