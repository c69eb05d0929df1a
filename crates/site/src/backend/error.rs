//! Errors returned by the backend API client.

use thiserror::Error;

/// Shown when nothing more specific is known.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused or timed out.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Bearer token missing, expired or rejected (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found (404).
    #[error("Not found")]
    NotFound,

    /// Request rejected by validation (400).
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Request conflicts with current state (409), e.g. deleting a category
    /// that is still referenced.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Backend failure (5xx).
    #[error("Server error: {status}")]
    Server { status: u16 },

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transport failure other than connect or timeout.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Unreachable(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// The message is the `error` field of a JSON body when present.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = error_message(body).unwrap_or_default();
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            400 => Self::BadRequest { message },
            409 => Self::Conflict { message },
            500..=599 => Self::Server { status },
            _ => Self::Api { status, message },
        }
    }

    /// Message supplied by the backend, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::BadRequest { message }
            | Self::Conflict { message }
            | Self::Api { message, .. } => Some(message.as_str()).filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Text shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable(_) => {
                "Cannot reach the server. Make sure the backend is running.".to_string()
            }
            Self::NotFound => "Content not found.".to_string(),
            Self::Server { .. } => "Server error. Please try again later.".to_string(),
            _ => self
                .server_message()
                .map_or_else(|| GENERIC_FAILURE.to_string(), ToString::to_string),
        }
    }

    /// Server message, or `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Whether retrying may succeed without changing anything.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unreachable(_) | Self::Server { .. })
    }

    /// Whether the backend rejected the bearer token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
