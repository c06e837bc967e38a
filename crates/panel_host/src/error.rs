//! Error type shared by every file-hosting API call.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failure reported by a [`crate::FileStoreService`] or download host call.
pub enum ApiError {
    /// The request never produced an HTTP response (offline, aborted, CORS).
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message taken from the `{"error": ...}` body, or a generic fallback.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// A local host capability (file save, clipboard) failed.
    #[error("{0}")]
    Host(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Builds a server error from a status code and raw response body.
    ///
    /// The server reports failures as `{"error": "<message>"}`; anything else falls back to a
    /// generic message carrying the status.
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|parsed| parsed.error)
            .ok()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        Self::Server { status, message }
    }

    /// Shorthand for a [`ApiError::Server`] value.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether the server rejected the call because the target already exists.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// User-facing message for inline errors and notices.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
