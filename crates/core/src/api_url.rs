//! Backend base URL normalization and image URL resolution.
//!
//! The backend is always addressed through a base URL that carries an explicit
//! scheme and ends in `/api`. Image paths stored in content are either
//! absolute, under the site's own `/images` assets, or relative to the
//! backend origin (uploads).

/// Base URL used when no override is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Placeholder served for empty image fields.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

/// Prefix of static assets served by the site itself.
pub const STATIC_IMAGES_PREFIX: &str = "/images";

const API_SUFFIX: &str = "/api";

/// Normalize a configured backend URL.
///
/// - missing or blank input falls back to [`DEFAULT_API_URL`]
/// - `:5000/api` becomes `http://localhost:5000/api`
/// - `//host/api` becomes `http://host/api`
/// - `host:5000` becomes `http://host:5000/api`
///
/// ```
/// use reshow_core::api_url::normalize_base_url;
///
/// assert_eq!(normalize_base_url(Some("example.com")), "http://example.com/api");
/// assert_eq!(normalize_base_url(Some(":5000")), "http://localhost:5000/api");
/// assert_eq!(normalize_base_url(None), "http://localhost:3000/api");
/// ```
#[must_use]
pub fn normalize_base_url(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return DEFAULT_API_URL.to_string();
    }

    let mut url = if raw.starts_with(':') {
        format!("http://localhost{raw}")
    } else if raw.starts_with("//") {
        format!("http:{raw}")
    } else if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    while url.ends_with('/') {
        url.pop();
    }

    if !url.ends_with(API_SUFFIX) {
        url.push_str(API_SUFFIX);
    }

    url
}

/// Origin of the backend: the base URL without its `/api` suffix.
#[must_use]
pub fn api_origin(base_url: &str) -> &str {
    base_url.strip_suffix(API_SUFFIX).unwrap_or(base_url)
}

/// Map a stored image path to a URL the browser can load.
///
/// ```
/// use reshow_core::api_url::resolve_image_url;
///
/// let base = "http://api.example.com/api";
/// assert_eq!(resolve_image_url("", base), "/images/placeholder.jpg");
/// assert_eq!(resolve_image_url("/images/logo.png", base), "/images/logo.png");
/// assert_eq!(
///     resolve_image_url("/uploads/a.jpg", base),
///     "http://api.example.com/uploads/a.jpg"
/// );
/// ```
#[must_use]
pub fn resolve_image_url(path: &str, base_url: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }
    if path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with(STATIC_IMAGES_PREFIX)
    {
        return path.to_string();
    }

    let origin = api_origin(base_url);
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}

/// Store uploads relative to the backend origin when the backend echoes its
/// own absolute URL, so saved content survives a change of host.
#[must_use]
pub fn relativize_upload_url(url: &str, base_url: &str) -> String {
    let origin = api_origin(base_url);
    match url.strip_prefix(origin) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => url.to_string(),
    }
}
