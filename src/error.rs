//! Error types for perfilar.

use std::path::PathBuf;

/// Result type alias for perfilar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in perfilar operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error during data processing.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error during file operations.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Input bytes could not be interpreted as a table.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// Table parsed successfully but contains zero rows.
    #[error("Table is empty")]
    EmptyTable,

    /// Invalid aggregate request input.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the invalid field(s).
        message: String,
    },

    /// Summary and missing table disagree on the column set.
    #[error("Column '{column}' present in one input but not the other")]
    ColumnMismatch {
        /// The column only one side knows about.
        column: String,
    },

    /// Schema mismatch between record batches.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the schema mismatch.
        message: String,
    },

    /// Unsupported file format.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The unsupported format name or extension.
        format: String,
    },
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a column mismatch error.
    pub fn column_mismatch(column: impl Into<String>) -> Self {
        Self::ColumnMismatch {
            column: column.into(),
        }
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Short machine-readable kind tag, used by the HTTP layer to
    /// distinguish the failure taxonomy in responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Arrow(_) => "arrow",
            Self::Parquet(_) => "parquet",
            Self::Parse { .. } => "parse",
            Self::EmptyTable => "empty_table",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::ColumnMismatch { .. } => "column_mismatch",
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::UnsupportedFormat { .. } => "unsupported_format",
        }
    }

    /// Whether this error was caused by client input rather than the
    /// service itself.
    #[must_use]
    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::EmptyTable | Self::InvalidRequest { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io(io_err, "/path/to/file");
        assert!(err.to_string().contains("/path/to/file"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_parse_error() {
        let err = Error::parse("not valid CSV");
        assert!(err.to_string().contains("not valid CSV"));
        assert_eq!(err.kind(), "parse");
        assert!(err.is_client_input());
    }

    #[test]
    fn test_empty_table() {
        let err = Error::EmptyTable;
        assert!(err.to_string().contains("empty"));
        assert_eq!(err.kind(), "empty_table");
        assert!(err.is_client_input());
    }

    #[test]
    fn test_invalid_request() {
        let err = Error::invalid_request("n_rows must be > 0");
        assert!(err.to_string().contains("n_rows must be > 0"));
        assert!(err.is_client_input());
    }

    #[test]
    fn test_column_mismatch() {
        let err = Error::column_mismatch("age");
        assert!(err.to_string().contains("age"));
        assert_eq!(err.kind(), "column_mismatch");
        assert!(!err.is_client_input());
    }

    #[test]
    fn test_schema_mismatch() {
        let err = Error::schema_mismatch("batch 1 differs from batch 0");
        assert!(err.to_string().contains("batch 1 differs from batch 0"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = Error::unsupported_format("xlsx");
        assert!(err.to_string().contains("xlsx"));
        assert!(!err.is_client_input());
    }
}
