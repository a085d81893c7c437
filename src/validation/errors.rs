//! Validation error types
//!
//! Validation failures are recoverable: they are reported to the caller and
//! never alter stored state.

use thiserror::Error;

use crate::schema::{SchemaError, Table};
use crate::storage::StorageError;

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reasons a candidate row is rejected
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Candidate does not carry one value per declared field
    #[error("{table} expects {expected} fields, got {actual}")]
    FieldCount {
        /// Target table
        table: Table,
        /// Declared arity
        expected: usize,
        /// Values supplied
        actual: usize,
    },

    /// A field is empty or whitespace
    #[error("All fields must be filled: '{0}' is blank")]
    MissingField(String),

    /// A date or time-of-day field does not parse
    #[error("Field '{0}' is not a valid date or time")]
    InvalidDate(String),

    /// A unique-designated field repeats an existing value
    #[error("Value for '{0}' already exists")]
    DuplicateValue(String),

    /// A foreign key points at no existing row
    #[error("Field '{0}' references a row that does not exist")]
    DanglingReference(String),

    /// Lookup against an undeclared table or field
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The record file could not be read while checking; carries the
    /// storage code unchanged
    #[error("Storage failure: {0}")]
    StorageUnavailable(#[from] StorageError),
}

impl ValidationError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::FieldCount { .. } => "GYM_FIELD_COUNT",
            Self::MissingField(_) => "GYM_MISSING_FIELD",
            Self::InvalidDate(_) => "GYM_INVALID_DATE",
            Self::DuplicateValue(_) => "GYM_DUPLICATE_VALUE",
            Self::DanglingReference(_) => "GYM_DANGLING_REFERENCE",
            Self::Schema(e) => e.code().code(),
            Self::StorageUnavailable(e) => e.code().code(),
        }
    }

    /// The offending field, when the failure is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField(f)
            | Self::InvalidDate(f)
            | Self::DuplicateValue(f)
            | Self::DanglingReference(f) => Some(f),
            _ => None,
        }
    }

    /// Whether the row itself was at fault, as opposed to the store
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::StorageUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_codes() {
        assert_eq!(
            ValidationError::DuplicateValue("Email".into()).code(),
            "GYM_DUPLICATE_VALUE"
        );
        assert_eq!(
            ValidationError::DanglingReference("Member_ID".into()).code(),
            "GYM_DANGLING_REFERENCE"
        );
        assert_eq!(
            ValidationError::Schema(SchemaError::unknown_table("X")).code(),
            "GYM_UNKNOWN_TABLE"
        );
    }

    #[test]
    fn test_storage_failure_is_not_a_rejection() {
        let err: ValidationError = StorageError::unavailable(
            "Failed to open record file",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        )
        .into();
        assert!(!err.is_rejection());
        assert_eq!(err.field(), None);
        assert!(ValidationError::MissingField("Name".into()).is_rejection());
    }

    #[test]
    fn test_storage_code_passes_through() {
        let err: ValidationError =
            StorageError::malformed_row(2, "Member row has 1 fields, expected 10").into();
        assert_eq!(err.code(), "GYM_STORAGE_MALFORMED_ROW");
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_display_names_field() {
        let err = ValidationError::DuplicateValue("Member_ID".into());
        assert!(err.to_string().contains("Member_ID"));
        assert_eq!(err.field(), Some("Member_ID"));
    }
}
