//! Error types for the sysprop generator
//!
//! All fallible operations return `Result<T, Error>`.
//! Generation is all-or-nothing: any error aborts the run before output.

use std::path::PathBuf;

use thiserror::Error;

/// Sysprop generator error types
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed schema text, or a naming/ownership/type-consistency violation
    #[error("Schema error: {0}")]
    Schema(String),

    /// Schema unreadable or output location unwritable
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a `Schema` error from anything printable
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    /// Attach a path to an underlying I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for validation and parse failures
    pub fn is_schema(&self) -> bool {
        matches!(self, Error::Schema(_))
    }
}

/// Result type alias for sysprop operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = Error::schema("There is no defined property");
        assert_eq!(err.to_string(), "Schema error: There is no defined property");
        assert!(err.is_schema());
    }

    #[test]
    fn test_io_error_keeps_path_and_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io("/tmp/missing.sysprop", source);
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.sysprop"));
        assert!(msg.contains("gone"));
        assert!(!err.is_schema());
        assert!(std::error::Error::source(&err).is_some());
    }
}
