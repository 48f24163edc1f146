//! # API
//!
//! Shared server state and the JSON routes a front end drives.

pub mod catalog;

use std::sync::Arc;
use tokio::sync::RwLock;

use unovadex_core::catalog::{CatalogLoader, RecordSource};
use unovadex_core::{DexConfig, Session};

/// Whether a catalog is being served
pub enum CatalogState {
    /// Loaded; the session holds filter and screen
    Ready(Session),
    /// The index fetch failed. Distinct from an empty catalog.
    Unavailable { error: String },
}

/// Application state
pub struct AppState {
    config: DexConfig,
    loader: CatalogLoader,
    pub catalog: RwLock<CatalogState>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build state and run the initial load
    pub async fn bootstrap(config: DexConfig, source: Arc<dyn RecordSource>) -> SharedState {
        let loader = CatalogLoader::with_config(source, &config);
        let catalog = load_catalog(&loader, &config).await;
        Arc::new(Self {
            config,
            loader,
            catalog: RwLock::new(catalog),
        })
    }

    /// Run the load again and replace the served catalog with a fresh session
    pub async fn reload(&self) {
        let catalog = load_catalog(&self.loader, &self.config).await;
        *self.catalog.write().await = catalog;
    }
}

async fn load_catalog(loader: &CatalogLoader, config: &DexConfig) -> CatalogState {
    match loader.load(config.window).await {
        Ok(catalog) => CatalogState::Ready(Session::new(Arc::new(catalog))),
        Err(e) => {
            tracing::error!(error = %e, "Catalog unavailable");
            CatalogState::Unavailable {
                error: e.to_string(),
            }
        }
    }
}
