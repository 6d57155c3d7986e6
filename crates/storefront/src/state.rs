//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shopify::{CommerceBackend, StorefrontClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the commerce backend.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: Arc<dyn CommerceBackend>,
}

impl AppState {
    /// Create application state backed by the Shopify Storefront API.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = Arc::new(StorefrontClient::new(&config.shopify));
        Self::with_backend(config, backend)
    }

    /// Create application state with an explicit commerce backend.
    #[must_use]
    pub fn with_backend(config: StorefrontConfig, backend: Arc<dyn CommerceBackend>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the commerce backend checkout runs against.
    #[must_use]
    pub fn backend(&self) -> &dyn CommerceBackend {
        self.inner.backend.as_ref()
    }
}
