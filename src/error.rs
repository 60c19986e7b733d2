// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Fetch-time failures travel up as `AppError` and abort the subtree they
//! belong to; render-time failures are `ConversionError`s, caught per node
//! and turned into a visible placeholder.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded; back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError => true,
            Self::HttpStatus(status) => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("Synced block cycle: {}", chain.join(" -> "))]
    SyncedCycle { chain: Vec<String> },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error(transparent)]
    NotionClient(#[from] NotionClientError),
}

impl AppError {
    /// Whether repeating the failed remote call may succeed.
    ///
    /// Transport failures and throttling/server-side codes qualify. Missing
    /// objects, bad credentials and malformed input surface immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkFailure(_) => true,
            AppError::NotionService { code, .. } => code.is_retryable(),
            AppError::NotionClient(NotionClientError::NotionApi { status, code, .. }) => {
                NotionErrorCode::from_api_response(code).is_retryable()
                    || u16::try_from(*status).map_or(false, is_retryable_status)
            }
            AppError::NotionClient(NotionClientError::Transport { .. }) => true,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// A subtree could not be retrieved after exhausting the retry policy.
#[derive(Error, Debug)]
#[error("Failed to fetch node {node_id} after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    /// Dashed ID of the node whose retrieval failed.
    pub node_id: String,
    pub attempts: u32,
    #[source]
    pub cause: Box<AppError>,
}

impl FetchError {
    pub fn new(node_id: impl Into<String>, attempts: u32, cause: AppError) -> Self {
        Self {
            node_id: node_id.into(),
            attempts,
            cause: Box::new(cause),
        }
    }
}

/// A single node could not be rendered.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("malformed table: {reason}")]
    MalformedTable { reason: String },

    #[error("children unavailable: {cause}")]
    ChildrenUnavailable { cause: String },

    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Notion client error mapping
#[derive(Error, Debug)]
pub enum NotionClientError {
    #[error("Failed to serialize request: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize response: {source}\nBody: {body}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("HTTP transport error: {message}")]
    Transport { message: String },

    #[error("Invalid authentication header: {message}")]
    InvalidHeader { message: String },

    #[error("Notion API error ({status}): {code} - {message}")]
    NotionApi {
        status: u32,
        code: String,
        message: String,
        request_id: Option<String>,
    },
}

// Convert notion_client errors to our error hierarchy
impl From<notion_client::NotionClientError> for NotionClientError {
    fn from(err: notion_client::NotionClientError) -> Self {
        use notion_client::NotionClientError as NcError;

        match err {
            NcError::FailedToSerialize { source } => Self::Serialization { source },
            NcError::FailedToDeserialize { source, body } => Self::Deserialization { source, body },
            NcError::FailedToRequest { source }
            | NcError::FailedToText { source }
            | NcError::FailedToBuildRequest { source } => Self::Transport {
                message: source.to_string(),
            },
            NcError::InvalidHeader { source } => Self::InvalidHeader {
                message: source.to_string(),
            },
            NcError::InvalidStatusCode { error } => Self::NotionApi {
                status: error.status,
                code: error.code,
                message: error.message,
                request_id: error.request_id,
            },
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn service_error(code: &str, status: u16) -> AppError {
        AppError::NotionService {
            code: NotionErrorCode::from_api_response(code),
            message: "boom".to_string(),
            status: reqwest::StatusCode::from_u16(status).unwrap(),
        }
    }

    #[test]
    fn throttling_and_server_errors_are_retryable() {
        assert!(service_error("rate_limited", 429).is_retryable());
        assert!(service_error("service_unavailable", 503).is_retryable());
        assert!(NotionErrorCode::from_http_status(502).is_retryable());
        assert!(NotionErrorCode::from_http_status(408).is_retryable());
    }

    #[test]
    fn client_errors_surface_immediately() {
        assert!(!service_error("object_not_found", 404).is_retryable());
        assert!(!service_error("unauthorized", 401).is_retryable());
        assert!(!AppError::InvalidId("x".to_string()).is_retryable());
    }

    #[test]
    fn api_error_mapping_uses_status_too() {
        let err = AppError::NotionClient(NotionClientError::NotionApi {
            status: 504,
            code: "gateway_timeout".to_string(),
            message: "upstream".to_string(),
            request_id: None,
        });
        assert!(err.is_retryable());
    }

    #[test]
    fn fetch_error_names_the_node() {
        let err = FetchError::new(
            "0123abcd-0000-0000-0000-000000000000",
            3,
            service_error("internal_server_error", 500),
        );
        let message = err.to_string();
        assert!(message.contains("0123abcd-0000-0000-0000-000000000000"));
        assert!(message.contains("3 attempt(s)"));
    }

    #[test]
    fn cycle_message_lists_chain() {
        let err = AppError::SyncedCycle {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "Synced block cycle: a -> b -> a");
    }
}
