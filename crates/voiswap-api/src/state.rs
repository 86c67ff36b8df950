//! Application state shared across API handlers

use std::sync::Arc;

use voiswap_core::{AppConfig, ChainGateway, PoolCatalog};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    catalog: PoolCatalog,
    gateway: Arc<dyn ChainGateway>,
}

impl AppState {
    /// Create application state. The catalog is immutable for the process
    /// lifetime; the gateway is shared by every request.
    pub fn new(config: AppConfig, catalog: PoolCatalog, gateway: Arc<dyn ChainGateway>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                gateway,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn catalog(&self) -> &PoolCatalog {
        &self.inner.catalog
    }

    pub fn gateway(&self) -> &dyn ChainGateway {
        self.inner.gateway.as_ref()
    }
}
