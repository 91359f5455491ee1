//! Error types for pg-core
//!
//! Provides error handling for:
//! - Configuration discovery at start-up
//! - Unknown specification lookups (the request layer's 404)
//! - Activity store set-up and writes
//! - Keep-warm pings

use pg_assets::AssetError;
use std::path::PathBuf;

/// Main pg-core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration base directory does not exist
    #[error("failed to find config base path at: {}", .0.display())]
    ConfigBaseMissing(PathBuf),

    /// Requested specification id is not among those discovered
    #[error("Request with invalid specification id = {specification_id} for plaything {plaything}")]
    UnknownSpecification {
        /// Plaything the request was for
        plaything: String,
        /// Identifier that was asked for
        specification_id: String,
    },

    /// Asset decoding failed
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Activity store error
    #[error("activity error: {0}")]
    Activity(#[from] ActivityError),
}

impl CoreError {
    /// Create unknown specification error
    #[inline]
    pub fn unknown_specification(plaything: impl Into<String>, specification_id: impl Into<String>) -> Self {
        Self::UnknownSpecification {
            plaything: plaything.into(),
            specification_id: specification_id.into(),
        }
    }

    /// HTTP status the request layer should answer with
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownSpecification { .. } => 404,
            _ => 500,
        }
    }

    /// Check if this is the unknown-specification case
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownSpecification { .. })
    }
}

/// Activity logging errors
#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    /// Required environment variable absent
    #[error("missing environment variable: {0}")]
    MissingEnv(String),

    /// Required core_config.json setting absent
    #[error("missing activity setting: {0}")]
    MissingConfig(String),

    /// Store access key is not valid base64
    #[error("invalid store key: {0}")]
    InvalidKey(String),

    /// Transport failure talking to the store
    #[error("store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
}

/// Keep-warm ping errors
#[derive(Debug, thiserror::Error)]
pub enum PingError {
    /// `PLAYGROUND_PING_URL_BASE` not set
    #[error("environment variable {0} is not set")]
    MissingBaseUrl(&'static str),

    /// Could not connect within the timeout
    #[error("request to {0} timed out (connection)")]
    ConnectTimeout(String),

    /// Connected but no response within the timeout
    #[error("request to {0} timed out (read)")]
    ReadTimeout(String),

    /// Any other transport failure
    #[error("request to {url} failed: {source}")]
    Request {
        /// Target URL
        url: String,
        /// Transport failure
        #[source]
        source: reqwest::Error,
    },
}

/// Result type alias for pg-core operations
pub type CoreResult<T> = Result<T, CoreError>;
