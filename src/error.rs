//! Error types for the embedding index

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Coarse classification of an [`IndexError`], for callers that render
/// or route failures without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The persisted file exists but cannot be parsed. Regenerate the index.
    CorruptFormat,
    /// Disk I/O failed. Retryable.
    Io,
    /// Query or entry vector does not match the table's dimensionality.
    DimensionMismatch,
    /// Caller supplied an invalid vector, record or query.
    InvalidInput,
    /// Embedding or rewrite service failed or timed out.
    Upstream,
    /// Configuration could not be read.
    Config,
}

/// Error types that can occur in index operations
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Corrupt index file '{path}' at line {line}: {reason}")]
    CorruptFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("IO error while {operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("{service} service failed during {operation}: {message}")]
    UpstreamService {
        service: &'static str,
        operation: String,
        message: String,
    },

    #[error("{service} service timed out after {after:?} during {operation}")]
    Timeout {
        service: &'static str,
        operation: String,
        after: Duration,
    },

    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

impl IndexError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        IndexError::CorruptFormat {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Wrap a collaborator failure, keeping its message and naming the call.
    pub fn upstream(
        service: &'static str,
        operation: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        IndexError::UpstreamService {
            service,
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CorruptFormat { .. } => ErrorKind::CorruptFormat,
            Self::Io { .. } => ErrorKind::Io,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::InvalidVector { .. } | Self::InvalidRecord { .. } | Self::InvalidQuery { .. } => {
                ErrorKind::InvalidInput
            }
            Self::UpstreamService { .. } | Self::Timeout { .. } => ErrorKind::Upstream,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::CorruptFormat { .. } => "CORRUPT_FORMAT",
            Self::Io { .. } => "IO_ERROR",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::InvalidVector { .. } => "INVALID_VECTOR",
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::InvalidQuery { .. } => "INVALID_QUERY",
            Self::UpstreamService { .. } => "UPSTREAM_SERVICE_ERROR",
            Self::Timeout { .. } => "UPSTREAM_TIMEOUT",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Whether a caller may reasonably retry the failed operation.
    /// The index itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io | ErrorKind::Upstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_status_code() {
        let err = IndexError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert_eq!(err.status_code(), "DIMENSION_MISMATCH");
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");
    }

    #[test]
    fn test_upstream_is_retryable() {
        let err = IndexError::upstream("embedding", "embed 3 texts", "503 Service Unavailable");
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.is_retryable());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_io_keeps_context() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = IndexError::io("writing", "/tmp/index.csv", source);
        assert_eq!(err.kind(), ErrorKind::Io);
        let msg = err.to_string();
        assert!(msg.contains("writing"));
        assert!(msg.contains("/tmp/index.csv"));
    }
}
