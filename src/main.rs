use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalogapi::{
    api::{self, AppState},
    config::CatalogMode,
    context::TrustProxy,
    store::{FileStore, MemoryStore, StoreKind, Trait},
    ServerConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalogapi=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    let store: StoreKind = match config.catalog_mode {
        CatalogMode::Memory => MemoryStore::from_file(&config.catalog_file)
            .with_context(|| format!("loading {}", config.catalog_file.display()))?
            .into(),
        CatalogMode::File => FileStore::new(&config.catalog_file).into(),
    };
    match store.count() {
        Ok(count) => tracing::info!(mode = ?config.catalog_mode, count, "catalog ready"),
        Err(e) => tracing::warn!(error = %e, "catalog not readable yet"),
    }

    let state = AppState { store: Arc::new(store), trust_proxy: TrustProxy(config.trust_proxy) };
    let app = api::app(state, &config);

    let addr = SocketAddr::from((config.host, config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    Ok(axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?)
}
