//! Error types for the OpenAlex client.

use std::time::Duration;

/// Errors that can occur when building queries for, or talking to, the OpenAlex API.
///
/// Validation variants are always returned before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum OpenAlexError {
    /// A required argument was empty.
    #[error("'{argument}' argument can not be empty")]
    EmptyInput { argument: &'static str },

    /// A filter, sort or group_by key is not accepted by the entity.
    #[error("'{key}' is not a valid {param} key. Valid keys are {}", .valid.join(","))]
    InvalidAttribute {
        param: &'static str,
        key: String,
        valid: Vec<String>,
    },

    /// A sort direction other than `asc` / `desc`.
    #[error("'{value}' is not a valid sort direction for '{key}'. Valid values are {}", .valid.join(","))]
    InvalidSortValue {
        key: String,
        value: String,
        valid: Vec<String>,
    },

    /// `relevance_score` requested outside of a text search.
    #[error("You can only sort by 'relevance_score' when searching")]
    InvalidSortContext,

    /// The ID namespace is not known for this entity.
    #[error("'{id_type}' is not a valid id type. Valid values are {}", .valid.join(","))]
    InvalidIdType { id_type: String, valid: Vec<String> },

    /// A bare ID that is neither a native ID nor a URL.
    #[error("'{0}' is not a valid id value. Needs to be a URL or OpenAlex ID")]
    InvalidIdValue(String),

    /// A `works_api_url` that does not point at the works list.
    #[error("Invalid works API URL: {0}")]
    InvalidApiUrl(String),

    /// An entity name outside the fixed set.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenAlex returned an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by OpenAlex (HTTP 429).
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Response body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenAlexError {
    /// Whether this error was raised by local validation rather than by the API.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput { .. }
                | Self::InvalidAttribute { .. }
                | Self::InvalidSortValue { .. }
                | Self::InvalidSortContext
                | Self::InvalidIdType { .. }
                | Self::InvalidIdValue(_)
                | Self::InvalidApiUrl(_)
                | Self::UnknownEntity(_)
        )
    }
}

/// Convenience alias for Results using [`OpenAlexError`].
pub type Result<T> = std::result::Result<T, OpenAlexError>;
