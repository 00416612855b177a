//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::CatalogService;
use crate::store::RestStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the remote store client, and the cached
/// catalog.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: RestStore,
    catalog: CatalogService<RestStore>,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store = RestStore::new(&config.store);
        let catalog = CatalogService::new(store.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the remote store client.
    #[must_use]
    pub fn store(&self) -> &RestStore {
        &self.inner.store
    }

    /// Get a reference to the cached product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService<RestStore> {
        &self.inner.catalog
    }
}
