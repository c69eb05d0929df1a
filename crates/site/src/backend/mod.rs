//! Backend REST API client.
//!
//! Every page of the site is rendered from data owned by the backend. This
//! client wraps `reqwest` with the conventions the backend expects:
//!
//! - Base URL normalized to carry a scheme and end in `/api`
//! - `Authorization: Bearer <token>` when the caller has a token
//! - Multipart uploads let `reqwest` set the boundary header
//! - Error bodies carry their message in an `error` field
//!
//! Endpoint methods live in the submodules, grouped by area.

mod auth;
mod catalog;
mod content;
mod error;
mod quotes;
mod users;

pub use content::{UploadFile, upload_failure_message};
pub use error::{ApiError, GENERIC_FAILURE};

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;

/// Backend API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Normalized base URL, ending in `/api`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&SecretString>) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and parse the JSON response.
    ///
    /// The body is read before the status is checked so error responses
    /// can contribute their message.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        // Empty bodies parse as `null` so optional results read as missing.
        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body)
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Send a request whose response body is irrelevant.
    async fn send_discarding(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status.as_u16(), &body))
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path, token)).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path, token).json(body))
            .await
    }

    /// Execute a PUT request with a JSON body, ignoring the response body.
    pub(crate) async fn put<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_discarding(self.request(Method::PUT, path, token).json(body))
            .await
    }

    /// Execute a PATCH request with a JSON body, ignoring the response body.
    pub(crate) async fn patch<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_discarding(self.request(Method::PATCH, path, token).json(body))
            .await
    }

    /// Execute a POST request whose response body is irrelevant.
    pub(crate) async fn post_discarding<B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<(), ApiError> {
        self.send_discarding(self.request(Method::POST, path, token).json(body))
            .await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        self.send_discarding(self.request(Method::DELETE, path, token))
            .await
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
