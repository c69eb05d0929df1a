//! Page content for public rendering and the section editor.
//!
//! Public section reads go through a short-lived `moka` cache. Only
//! successful reads are cached, so a backend outage never pins the
//! defaults; admin saves invalidate the keys they touch.

use std::collections::BTreeMap;
use std::time::Duration;

use moka::future::Cache;
use reshow_core::content::about::decompose;
use reshow_core::content::defaults::{hardcoded, layer_page_values};
use reshow_core::content::{ContentBundle, PageSources, SectionContent, SectionId, merge};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::backend::{ApiError, BackendClient};

/// Maximum number of cached entries (17 sections plus page documents).
const CACHE_CAPACITY: u64 = 64;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Section(SectionId),
    About,
    ServicesPage,
}

#[derive(Debug, Clone)]
enum CacheValue {
    Section(SectionContent),
    Document(Value),
}

/// Cached reads of public page content.
#[derive(Clone)]
pub struct ContentCache {
    backend: BackendClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl ContentCache {
    /// Create a cache in front of `backend`.
    #[must_use]
    pub fn new(backend: BackendClient, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self { backend, cache }
    }

    /// Content of one section as served by `GET /content/:section`.
    ///
    /// # Errors
    ///
    /// Returns error if the section is not cached and the request fails.
    #[instrument(skip(self, token), fields(section = %id))]
    pub async fn section(
        &self,
        id: SectionId,
        token: Option<&SecretString>,
    ) -> Result<SectionContent, ApiError> {
        let key = CacheKey::Section(id);
        if let Some(CacheValue::Section(content)) = self.cache.get(&key).await {
            debug!("Cache hit for section");
            return Ok(content);
        }

        let content = self.backend.section(id, token).await?;
        self.cache
            .insert(key, CacheValue::Section(content.clone()))
            .await;
        Ok(content)
    }

    /// The about document (`GET /about`).
    ///
    /// # Errors
    ///
    /// Returns error if the document is not cached and the request fails.
    #[instrument(skip_all)]
    pub async fn about(&self, token: Option<&SecretString>) -> Result<Value, ApiError> {
        if let Some(CacheValue::Document(doc)) = self.cache.get(&CacheKey::About).await {
            debug!("Cache hit for about document");
            return Ok(doc);
        }

        let doc = self.backend.about(token).await?;
        self.cache
            .insert(CacheKey::About, CacheValue::Document(doc.clone()))
            .await;
        Ok(doc)
    }

    /// The services page header (`GET /services-content`).
    ///
    /// # Errors
    ///
    /// Returns error if the header is not cached and the request fails.
    #[instrument(skip_all)]
    pub async fn services_page(
        &self,
        token: Option<&SecretString>,
    ) -> Result<SectionContent, ApiError> {
        if let Some(CacheValue::Section(content)) = self.cache.get(&CacheKey::ServicesPage).await {
            debug!("Cache hit for services page");
            return Ok(content);
        }

        let content = self.backend.services_page(token).await?;
        self.cache
            .insert(CacheKey::ServicesPage, CacheValue::Section(content.clone()))
            .await;
        Ok(content)
    }

    /// Effective content of one public section: defaults with the section's
    /// saved content merged over them.
    ///
    /// # Errors
    ///
    /// Returns error if the section cannot be read.
    pub async fn effective(
        &self,
        id: SectionId,
        token: Option<&SecretString>,
    ) -> Result<SectionContent, ApiError> {
        let fetched = self.section(id, token).await?;
        Ok(merge(&hardcoded(id), &fetched))
    }

    /// Header of the services page.
    ///
    /// `/content/services` wins when it has anything; otherwise the values
    /// of `/services-content` are layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` as soon as either read reports it, or the
    /// error of `/services-content` when both reads fail.
    pub async fn services_header(
        &self,
        token: Option<&SecretString>,
    ) -> Result<SectionContent, ApiError> {
        match self.section(SectionId::Services, token).await {
            Ok(content) if !content.is_empty() => {
                return Ok(merge(&hardcoded(SectionId::Services), &content));
            }
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => debug!("Falling back to /services-content: {e}"),
            Ok(_) => {}
        }

        let page = self.services_page(token).await?;
        Ok(layer_page_values(hardcoded(SectionId::Services), &page))
    }

    /// Drop cached content after `id` was saved.
    pub async fn invalidate(&self, id: SectionId) {
        if id.is_about_family() {
            self.cache.invalidate(&CacheKey::About).await;
            return;
        }
        self.cache.invalidate(&CacheKey::Section(id)).await;
        if id == SectionId::Services {
            self.cache.invalidate(&CacheKey::ServicesPage).await;
        }
    }

    /// Drop every cached entry.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

/// The seven about sections, page values layered over the defaults.
///
/// `doc` is the about document; `None` (read failed) gives the defaults.
#[must_use]
pub fn about_sections(doc: Option<&Value>) -> BTreeMap<SectionId, SectionContent> {
    let parts: BTreeMap<SectionId, SectionContent> = doc
        .map(|doc| decompose(doc).into_iter().collect())
        .unwrap_or_default();

    SectionId::ABOUT_FAMILY
        .into_iter()
        .map(|id| {
            let defaults = hardcoded(id);
            let content = match parts.get(&id) {
                Some(part) => layer_page_values(defaults, part),
                None => defaults,
            };
            (id, content)
        })
        .collect()
}

/// Load every section for the editor, bypassing the cache.
///
/// The saved overrides are required; the page sources only refine the
/// defaults and are skipped when they cannot be read.
///
/// # Errors
///
/// Returns error if the saved overrides cannot be read, or `Unauthorized`
/// if any read reports it.
#[instrument(skip_all)]
pub async fn load_bundle(
    backend: &BackendClient,
    token: &SecretString,
) -> Result<ContentBundle, ApiError> {
    let (overrides, hero, about, services) = tokio::join!(
        backend.saved_content(token),
        backend.section(SectionId::Hero, Some(token)),
        backend.about(Some(token)),
        backend.services_page(Some(token)),
    );

    let overrides = overrides?;
    let pages = PageSources {
        hero: page_source("hero", hero)?,
        about: page_source("about", about)?,
        services: page_source("services-content", services)?,
    };
    Ok(ContentBundle::resolve(&overrides, &pages))
}

fn page_source<T>(name: &str, result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_unauthorized() => Err(e),
        Err(e) => {
            tracing::warn!("Failed to fetch {name} defaults: {e}");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::json;

    use super::*;
    use crate::backend::tests::{client, serve};

    fn cache(base_url: &str) -> ContentCache {
        ContentCache::new(client(base_url), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_section_reads_are_cached_until_invalidated() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().route(
            "/api/content/hero",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    axum::Json(json!({"title": "Cached"}))
                }
            }),
        );
        let content = cache(&serve(app).await);

        let first = content.effective(SectionId::Hero, None).await.unwrap();
        let second = content.effective(SectionId::Hero, None).await.unwrap();
        assert_eq!(first["title"], "Cached");
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        content.invalidate(SectionId::Hero).await;
        content.effective(SectionId::Hero, None).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = Router::new().route(
            "/api/content/gallery",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }),
        );
        let content = cache(&serve(app).await);

        assert!(content.section(SectionId::Gallery, None).await.is_err());
        assert!(content.section(SectionId::Gallery, None).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_effective_merges_over_defaults() {
        let app = Router::new().route(
            "/api/content/contact",
            get(|| async { axum::Json(json!({"phone": "+263 000 000"})) }),
        );
        let content = cache(&serve(app).await);

        let contact = content.effective(SectionId::Contact, None).await.unwrap();
        assert_eq!(contact["phone"], "+263 000 000");
        assert_eq!(contact["email"], "sales@reshow.co.zw");
    }

    #[tokio::test]
    async fn test_services_header_falls_back_to_services_content() {
        let app = Router::new()
            .route("/api/content/services", get(|| async { axum::Json(json!({})) }))
            .route(
                "/api/services-content",
                get(|| async { axum::Json(json!({"title": "What We Do", "description": ""})) }),
            );
        let content = cache(&serve(app).await);

        let header = content.services_header(None).await.unwrap();
        assert_eq!(header["title"], "What We Do");
        assert_eq!(
            header["description"],
            "Comprehensive branding solutions for your organisation"
        );
    }

    #[tokio::test]
    async fn test_services_header_prefers_content_store() {
        let app = Router::new().route(
            "/api/content/services",
            get(|| async { axum::Json(json!({"title": "Branding"})) }),
        );
        let content = cache(&serve(app).await);

        let header = content.services_header(None).await.unwrap();
        assert_eq!(header["title"], "Branding");
    }

    #[test]
    fn test_about_sections_default_when_unavailable() {
        let sections = about_sections(None);
        assert_eq!(sections.len(), 7);
        assert_eq!(sections[&SectionId::Mission]["title"], "Our Mission");
    }

    #[test]
    fn test_about_sections_layer_document_values() {
        let doc = json!({
            "mission": {"title": "", "content": "Brand everything."},
            "stats": {"years": "15+"}
        });
        let sections = about_sections(Some(&doc));
        assert_eq!(sections[&SectionId::Mission]["title"], "Our Mission");
        assert_eq!(sections[&SectionId::Mission]["content"], "Brand everything.");
        assert_eq!(sections[&SectionId::AboutStats]["years"], "15+");
    }

    #[tokio::test]
    async fn test_load_bundle_tolerates_missing_page_sources() {
        let app = Router::new().route(
            "/api/admin/content",
            get(|| async { axum::Json(json!({"gallery": {"title": "Our Work"}})) }),
        );
        let backend = client(&serve(app).await);
        let token = SecretString::from("t".to_string());

        let bundle = load_bundle(&backend, &token).await.unwrap();
        assert_eq!(bundle.get(SectionId::Gallery)["title"], "Our Work");
        assert_eq!(bundle.get(SectionId::Hero)["buttonText"], "Request Quote");
    }
}
