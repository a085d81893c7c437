//! API error types
//!
//! Validation and storage errors pass through unchanged; their codes are
//! preserved by [`ApiError::code`].

use thiserror::Error;

use crate::schema::Table;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by [`GymHandler`](super::GymHandler)
#[derive(Debug, Error)]
pub enum ApiError {
    /// Delete or lookup was asked for a blank member id
    #[error("Please enter a valid Member ID")]
    MissingMemberId,

    /// Search was asked for a blank term
    #[error("Please enter a search term")]
    MissingSearchTerm,

    /// Update was asked for a blank key
    #[error("Key value must not be blank")]
    MissingKey,

    /// No row matched
    #[error("No {table} row with key '{key}'")]
    NotFound {
        /// Table searched
        table: Table,
        /// Key searched for
        key: String,
    },

    /// A stored value could not be read as a date
    #[error("Stored {field} '{value}' for '{key}' is not a valid date")]
    InvalidStoredDate {
        /// Key of the offending row
        key: String,
        /// Field name
        field: &'static str,
        /// Stored value
        value: String,
    },

    /// Candidate row rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Record file failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingMemberId => "GYM_MISSING_MEMBER_ID",
            Self::MissingSearchTerm => "GYM_MISSING_SEARCH_TERM",
            Self::MissingKey => "GYM_MISSING_KEY",
            Self::NotFound { .. } => "GYM_NOT_FOUND",
            Self::InvalidStoredDate { .. } => "GYM_INVALID_STORED_DATE",
            Self::Validation(e) => e.code(),
            Self::Storage(e) => e.code().code(),
        }
    }

    pub(crate) fn not_found(table: Table, key: impl Into<String>) -> Self {
        Self::NotFound {
            table,
            key: key.into(),
        }
    }
}
