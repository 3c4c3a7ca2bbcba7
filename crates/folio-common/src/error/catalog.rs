//! Catalog error types.
//!
//! Provides the error types for configuration, source queries, value
//! adaptation, and table registry operations.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors.
///
/// These codes can be used for programmatic error handling and
/// are stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // General errors (0x0000 - 0x00FF)
    /// Unknown or unspecified error.
    Unknown = 0x0000,
    /// Internal error (bug).
    Internal = 0x0001,
    /// Invalid argument provided.
    InvalidArgument = 0x0003,
    /// General I/O error.
    Io = 0x0004,

    // Configuration errors (0x0100 - 0x01FF)
    /// Configuration failed validation.
    InvalidConfig = 0x0100,
    /// Configuration text could not be parsed.
    ConfigParse = 0x0101,

    // Source errors (0x0200 - 0x02FF)
    /// The backing store rejected or failed a query.
    SourceQuery = 0x0200,
    /// A returned row had the wrong number of columns.
    MalformedRow = 0x0201,
    /// A returned cell had the wrong storage type.
    UnexpectedValue = 0x0202,

    // Adaptation errors (0x0300 - 0x03FF)
    /// A raw value could not be converted to its domain value.
    AdaptationFailed = 0x0300,

    // Registry errors (0x0400 - 0x04FF)
    /// No table is registered under the requested name.
    TableNotFound = 0x0400,
}

impl ErrorCode {
    /// Returns the numeric code.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match (*self as u16) >> 8 {
            0x00 => "General",
            0x01 => "Config",
            0x02 => "Source",
            0x03 => "Adaptation",
            0x04 => "Registry",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The main error type for folio.
///
/// Source failures (`SourceQuery`, `MalformedRow`, `UnexpectedValue`) abort a
/// table build and leave the previously published snapshot in place.
/// `Adaptation` carries the failure of the flexible timestamp parser.
///
/// # Example
///
/// ```rust
/// use folio_common::error::{FolioError, FolioResult};
///
/// fn lookup(name: &str) -> FolioResult<()> {
///     Err(FolioError::TableNotFound { table: name.to_string() })
/// }
///
/// assert_eq!(lookup("tags").unwrap_err().to_string(), "table 'tags' not found");
/// ```
#[derive(Debug, Error)]
pub enum FolioError {
    // ==========================================================================
    // General Errors
    // ==========================================================================
    /// Internal error - this indicates a bug.
    #[error("internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },

    /// Invalid argument provided.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// I/O error from the underlying system.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Error message.
        message: String,
    },

    /// Configuration text could not be parsed.
    #[error("failed to parse configuration: {source}")]
    ConfigParse {
        /// The underlying TOML error.
        #[from]
        source: toml::de::Error,
    },

    // ==========================================================================
    // Source Errors
    // ==========================================================================
    /// The backing store failed a query.
    #[error("source query failed: {reason} (query: {query})")]
    SourceQuery {
        /// Query text that failed.
        query: String,
        /// Reason reported by the backing store.
        reason: String,
    },

    /// A row came back with the wrong number of columns.
    #[error("malformed row for table '{table}': expected {expected} columns, got {actual} (query: {query})")]
    MalformedRow {
        /// Field whose build received the row.
        table: String,
        /// Query text that produced the row.
        query: String,
        /// Expected column count.
        expected: usize,
        /// Actual column count.
        actual: usize,
    },

    /// A cell had the wrong storage type for its column.
    #[error("unexpected value in table '{table}', column {column}: expected {expected}, got {actual}")]
    UnexpectedValue {
        /// Field whose build received the value.
        table: String,
        /// Zero-based column position.
        column: usize,
        /// Expected storage type.
        expected: String,
        /// Description of the value received.
        actual: String,
    },

    // ==========================================================================
    // Adaptation Errors
    // ==========================================================================
    /// A raw value could not be converted to its domain value.
    #[error("cannot adapt value {value:?} for field '{field}': {reason}")]
    Adaptation {
        /// Field being adapted.
        field: String,
        /// The raw value, rendered as text.
        value: String,
        /// Reason for failure.
        reason: String,
    },

    // ==========================================================================
    // Registry Errors
    // ==========================================================================
    /// Table not found.
    #[error("table '{table}' not found")]
    TableNotFound {
        /// The missing table.
        table: String,
    },
}

impl FolioError {
    /// Returns the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Internal { .. } => ErrorCode::Internal,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::Io { .. } => ErrorCode::Io,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::ConfigParse { .. } => ErrorCode::ConfigParse,
            Self::SourceQuery { .. } => ErrorCode::SourceQuery,
            Self::MalformedRow { .. } => ErrorCode::MalformedRow,
            Self::UnexpectedValue { .. } => ErrorCode::UnexpectedValue,
            Self::Adaptation { .. } => ErrorCode::AdaptationFailed,
            Self::TableNotFound { .. } => ErrorCode::TableNotFound,
        }
    }

    /// Returns true if repeating the same reload could succeed.
    ///
    /// Only backing-store failures qualify; the caller decides whether to
    /// retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceQuery { .. })
    }

    /// Returns true if this error came from the backing store or the shape
    /// of the rows it returned.
    #[must_use]
    pub const fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceQuery { .. } | Self::MalformedRow { .. } | Self::UnexpectedValue { .. }
        )
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates a source query error.
    #[must_use]
    pub fn source_query(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceQuery {
            query: query.into(),
            reason: reason.into(),
        }
    }
}
