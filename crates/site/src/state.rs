//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{ApiError, BackendClient};
use crate::config::SiteConfig;
use crate::content::ContentCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client, the public content cache and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    backend: BackendClient,
    content: ContentCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, ApiError> {
        let backend = BackendClient::new(&config.api)?;
        let content = ContentCache::new(backend.clone(), config.content_cache_ttl);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                content,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the public content cache.
    #[must_use]
    pub fn content(&self) -> &ContentCache {
        &self.inner.content
    }
}
