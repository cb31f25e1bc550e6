//! Error types for lexport operations.
//!
//! Errors carry a stable [`ErrorCode`] so the binary can decide on the exit
//! status without matching on message text.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lexport operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Main error type for all lexport operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The source store could not be found or opened.
    #[error("Source unavailable: {message}")]
    SourceUnavailable {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A query against the source store failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Serializing or persisting the output document failed.
    #[error("Write error for {}: {message}", .path.display())]
    Write {
        message: String,
        code: ErrorCode,
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Source (SRC_xxx)
    SrcNotFound,
    SrcOpenFailed,

    // Database (DB_xxx)
    DbQueryFailed,

    // Configuration (CFG_xxx)
    CfgInvalid,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValInvalidTimestamp,

    // Write (WRT_xxx)
    WrtSerializeFailed,
    WrtPersistFailed,

    // IO / serialization
    Io,
    Serialization,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SrcNotFound => "SRC_001",
            ErrorCode::SrcOpenFailed => "SRC_002",
            ErrorCode::DbQueryFailed => "DB_001",
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValInvalidTimestamp => "VAL_002",
            ErrorCode::WrtSerializeFailed => "WRT_001",
            ErrorCode::WrtPersistFailed => "WRT_002",
            ErrorCode::Io => "IO_001",
            ErrorCode::Serialization => "SER_001",
        }
    }
}

impl ExportError {
    /// Create a source-not-found error.
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::SourceUnavailable {
            message: format!("database file not found: {}", path.display()),
            code: ErrorCode::SrcNotFound,
            source: None,
        }
    }

    /// Create a source-open error wrapping the underlying driver error.
    pub fn source_open(
        path: impl Into<PathBuf>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        let path = path.into();
        Self::SourceUnavailable {
            message: format!("cannot open {}: {}", path.display(), err),
            code: ErrorCode::SrcOpenFailed,
            source: Some(Box::new(err)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error for an unparseable cutoff timestamp.
    pub fn invalid_timestamp(value: impl AsRef<str>) -> Self {
        Self::Validation {
            message: format!("invalid export cutoff '{}'", value.as_ref()),
            code: ErrorCode::ValInvalidTimestamp,
            suggestion: Some(
                "Use YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or an RFC 3339 timestamp".to_string(),
            ),
        }
    }

    /// Create a write error.
    pub fn write(
        path: impl Into<PathBuf>,
        code: ErrorCode,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Write {
            message: err.to_string(),
            code,
            path: path.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SourceUnavailable { code, .. } => *code,
            Self::Database { code, .. } => *code,
            Self::Configuration(_) => ErrorCode::CfgInvalid,
            Self::Validation { code, .. } => *code,
            Self::Write { code, .. } => *code,
            Self::Io(_) => ErrorCode::Io,
            Self::Serialization(_) => ErrorCode::Serialization,
        }
    }

    /// Whether the run must end with a non-zero exit status.
    ///
    /// Write failures are reported to the operator and end the run normally.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Write { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::SourceUnavailable { .. } => Some("Check the source database path"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Write { .. } => Some("Check free space and permissions, then re-run the export"),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for ExportError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbQueryFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_error() {
        let err = ExportError::source_not_found("missing.db");
        assert_eq!(err.code(), ErrorCode::SrcNotFound);
        assert!(err.is_fatal());
        assert!(err.to_string().contains("missing.db"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_write_error_is_not_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ExportError::write("out.json", ErrorCode::WrtPersistFailed, io);
        assert!(!err.is_fatal());
        assert_eq!(err.code().as_str(), "WRT_002");
        assert!(err.to_string().contains("out.json"));
    }

    #[test]
    fn test_invalid_timestamp_has_suggestion() {
        let err = ExportError::invalid_timestamp("yesterday");
        assert_eq!(err.code(), ErrorCode::ValInvalidTimestamp);
        assert!(err.suggestion().unwrap().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::SrcNotFound.as_str(), "SRC_001");
        assert_eq!(ErrorCode::DbQueryFailed.as_str(), "DB_001");
    }
}
