//! Error types for asset loading
//!
//! Provides error handling for:
//! - JSON documents (not found vs. unparseable)
//! - CSV tables and column coercion
//! - Markdown placeholder substitution
//! - Binary object decoding

use std::path::PathBuf;

/// Errors raised while reading or decoding an asset file
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// File does not exist
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Requested file
        path: PathBuf,
    },

    /// IO error during file read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON
    #[error("syntax error in {}: {message}", path.display())]
    Syntax {
        /// File being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Malformed CSV
    #[error("csv error in {}: {source}", path.display())]
    Csv {
        /// File being read
        path: PathBuf,
        /// Reader failure
        #[source]
        source: csv::Error,
    },

    /// Cell could not be converted to the requested column type
    #[error("column '{column}' row {row}: cannot read {value:?} as {expected}")]
    Coercion {
        /// Column header
        column: String,
        /// Zero-based data row
        row: usize,
        /// Cell text
        value: String,
        /// Requested type name
        expected: &'static str,
    },

    /// Placeholder named in the text has no replacement
    #[error("no replacement supplied for placeholder '{0}'")]
    MissingPlaceholder(String),

    /// Single `{` or `}` that is neither a placeholder nor an escape
    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },

    /// Binary object could not be decoded into the requested type
    #[error("decode error in {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

impl AssetError {
    /// Create IO error for path, mapping `NotFound` to its own variant
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Create syntax error for path
    pub fn syntax_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create CSV error for path
    pub fn csv_error(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Whether the underlying file was missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for asset operations
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguished() {
        let err = AssetError::io_error(
            "a.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "file not found: a.json");

        let err = AssetError::io_error(
            "a.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no"),
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn coercion_display() {
        let err = AssetError::Coercion {
            column: "age".to_string(),
            row: 3,
            value: "x".to_string(),
            expected: "int",
        };
        assert_eq!(err.to_string(), "column 'age' row 3: cannot read \"x\" as int");
    }
}
