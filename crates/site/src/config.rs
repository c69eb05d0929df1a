//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `RESHOW_BASE_URL` - Public URL of the site
//! - `RESHOW_SESSION_SECRET` - Session cookie signing key (min 64 chars, high entropy)
//!
//! ## Optional
//! - `RESHOW_HOST` - Bind address (default: 127.0.0.1)
//! - `RESHOW_PORT` - Listen port (default: 3000)
//! - `RESHOW_API_URL` - Backend API base URL (default: <http://localhost:3000/api>)
//! - `RESHOW_API_TIMEOUT_SECS` - Backend request timeout (default: 10)
//! - `RESHOW_CONTENT_CACHE_TTL_SECS` - Public content cache TTL (default: 30)
//! - `RESHOW_IDLE_TIMEOUT_SECS` - Admin idle logout (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use reshow_core::api_url::normalize_base_url;
use reshow_core::auth::IDLE_TIMEOUT_SECS;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Cookie signing keys are 64 bytes.
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site configuration.
///
/// Implements `Debug` manually to redact the session secret.
#[derive(Clone)]
pub struct SiteConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Session cookie signing secret
    pub session_secret: SecretString,
    /// Backend API configuration
    pub api: ApiConfig,
    /// How long public section reads stay cached
    pub content_cache_ttl: Duration,
    /// Admin inactivity before forced logout, in seconds
    pub idle_timeout_secs: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("session_secret", &"[REDACTED]")
            .field("api", &self.api)
            .field("content_cache_ttl", &self.content_cache_ttl)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .finish_non_exhaustive()
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Normalized base URL, always ending in `/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_optional_env("RESHOW_API_URL");
        let timeout_secs = get_env_or_default("RESHOW_API_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("RESHOW_API_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            base_url: normalize_base_url(raw.as_deref()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the session secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("RESHOW_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("RESHOW_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("RESHOW_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("RESHOW_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("RESHOW_BASE_URL")?;
        let session_secret = get_validated_secret("RESHOW_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "RESHOW_SESSION_SECRET")?;

        let api = ApiConfig::from_env()?;
        let content_cache_ttl = get_env_or_default("RESHOW_CONTENT_CACHE_TTL_SECS", "30")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "RESHOW_CONTENT_CACHE_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;
        let idle_timeout_secs =
            get_env_or_default("RESHOW_IDLE_TIMEOUT_SECS", &IDLE_TIMEOUT_SECS.to_string())
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "RESHOW_IDLE_TIMEOUT_SECS".to_string(),
                        "must be a positive number of seconds".to_string(),
                    )
                })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            api,
            content_cache_ttl,
            idle_timeout_secs,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable; blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Configuration pointing at `api_url`, for router tests.
    pub(crate) fn test_config(api_url: &str) -> SiteConfig {
        SiteConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(
                "k9X2mQ7vL4pR8tW1zB6nC3hJ5fD0sG9aY2uE7iO4kM1xV8qT5rN3bH6wZ0cF2jL9".to_string(),
            ),
            api: ApiConfig {
                base_url: normalize_base_url(Some(api_url)),
                timeout: Duration::from_secs(2),
            },
            content_cache_ttl: Duration::from_secs(30),
            idle_timeout_secs: IDLE_TIMEOUT_SECS,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-session-key-goes-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(64), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_length() {
        let short = SecretString::from("x".repeat(32));
        assert!(validate_session_secret(&short, "TEST_SESSION").is_err());
        let long = SecretString::from("x".repeat(64));
        assert!(validate_session_secret(&long, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_test_secret_passes_validation() {
        let config = test_config("http://127.0.0.1:9");
        let secret = config.session_secret.expose_secret();
        assert!(validate_secret_strength(secret, "TEST").is_ok());
        assert!(validate_session_secret(&config.session_secret, "TEST").is_ok());
    }

    #[test]
    fn test_socket_addr_and_secure() {
        let mut config = test_config("http://127.0.0.1:9");
        config.port = 3000;
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(!config.is_secure());
        config.base_url = "https://reshow.co.zw".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = test_config("http://127.0.0.1:9");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("k9X2mQ7v"));
    }

    #[test]
    fn test_api_base_is_normalized() {
        let config = test_config("localhost:4000");
        assert_eq!(config.api.base_url, "http://localhost:4000/api");
    }
}
