//! Storage error types
//!
//! Error codes:
//! - GYM_STORAGE_UNAVAILABLE (ERROR severity)
//! - GYM_STORAGE_WRITE_FAILED (ERROR severity)
//! - GYM_STORAGE_MALFORMED_ROW (ERROR severity)
//!
//! A failed read is never reported as "no rows"; callers see one of these.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller may retry
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// The record file could not be opened or read
    GymStorageUnavailable,
    /// A write, flush or rename failed
    GymStorageWriteFailed,
    /// A row could not be decoded against the schema
    GymStorageMalformedRow,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::GymStorageUnavailable => "GYM_STORAGE_UNAVAILABLE",
            StorageErrorCode::GymStorageWriteFailed => "GYM_STORAGE_WRITE_FAILED",
            StorageErrorCode::GymStorageMalformedRow => "GYM_STORAGE_MALFORMED_ROW",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

type BoxedSource = Box<dyn StdError + Send + Sync + 'static>;

/// Storage error type with context
#[derive(Debug)]
pub struct StorageError {
    /// Error code
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying I/O or codec error if applicable
    source: Option<BoxedSource>,
}

impl StorageError {
    fn with_source(
        code: StorageErrorCode,
        message: impl Into<String>,
        source: impl Into<BoxedSource>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: Some(source.into()),
        }
    }

    /// The record file could not be opened or read
    pub fn unavailable(message: impl Into<String>, source: io::Error) -> Self {
        Self::with_source(StorageErrorCode::GymStorageUnavailable, message, source)
    }

    /// The CSV reader failed mid-scan
    pub fn read_failed(message: impl Into<String>, source: csv::Error) -> Self {
        // An I/O failure under the codec is still an availability problem.
        let code = if source.is_io_error() {
            StorageErrorCode::GymStorageUnavailable
        } else {
            StorageErrorCode::GymStorageMalformedRow
        };
        let line = source.position().map(|p| p.line());
        let mut err = Self::with_source(code, message, source);
        err.details = line.map(|l| format!("line: {}", l));
        err
    }

    /// A write, flush or rename failed
    pub fn write_failed(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        Self::with_source(StorageErrorCode::GymStorageWriteFailed, message, source)
    }

    /// A row did not match its table's declaration
    pub fn malformed_row(line: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::GymStorageMalformedRow,
            message: reason.into(),
            details: Some(format!("line: {}", line)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Whether the file itself could not be reached
    pub fn is_unavailable(&self) -> bool {
        self.code == StorageErrorCode::GymStorageUnavailable
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl StdError for StorageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
