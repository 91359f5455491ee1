//! Request error pages
//!
//! What the request layer shows when a handler fails. An unknown
//! specification is passed through as a 404 with its message; anything else
//! is logged in full and rendered as a short apology naming only the error
//! kind.

use crate::error::CoreError;
use std::error::Error;

/// Status and body for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    /// HTTP status code
    pub status: u16,
    /// Page markup
    pub body: String,
}

impl ErrorPage {
    /// Page for a [`CoreError`]
    #[must_use]
    pub fn from_core_error(path: &str, err: &CoreError) -> Self {
        if err.is_not_found() {
            return Self {
                status: err.status_code(),
                body: err.to_string(),
            };
        }
        Self::from_error(path, err, kind_of_core_error(err))
    }

    /// Page for any other handler error, logged with its source chain
    #[must_use]
    pub fn from_error<E: Error + ?Sized>(path: &str, err: &E, kind: &str) -> Self {
        tracing::error!("Error processing request to {}. Exception information follows:", path);
        tracing::error!("{}: {}", kind, err);
        let mut source = err.source();
        while let Some(cause) = source {
            tracing::error!("  caused by: {}", cause);
            source = cause.source();
        }

        Self {
            status: 500,
            body: format!("An error occurred. It has been logged.<hr/> {kind} : {err}"),
        }
    }
}

fn kind_of_core_error(err: &CoreError) -> &'static str {
    match err {
        CoreError::ConfigBaseMissing(_) => "ConfigBaseMissing",
        CoreError::UnknownSpecification { .. } => "UnknownSpecification",
        CoreError::Asset(_) => "AssetError",
        CoreError::Activity(_) => "ActivityError",
    }
}
