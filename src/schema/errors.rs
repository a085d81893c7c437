//! Schema error types
//!
//! Error codes:
//! - GYM_UNKNOWN_TABLE (REJECT)
//! - GYM_UNKNOWN_FIELD (REJECT)

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Table name not in the registry
    GymUnknownTable,
    /// Field name not declared on the table
    GymUnknownField,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::GymUnknownTable => "GYM_UNKNOWN_TABLE",
            SchemaErrorCode::GymUnknownField => "GYM_UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema lookup error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
}

impl SchemaError {
    /// Create an unknown table error
    pub fn unknown_table(name: &str) -> Self {
        Self {
            code: SchemaErrorCode::GymUnknownTable,
            message: format!("Table '{}' not found", name),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(table: &str, field: &str) -> Self {
        Self {
            code: SchemaErrorCode::GymUnknownField,
            message: format!("Table '{}' has no field '{}'", table, field),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema lookups
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::GymUnknownTable.code(), "GYM_UNKNOWN_TABLE");
        assert_eq!(SchemaErrorCode::GymUnknownField.code(), "GYM_UNKNOWN_FIELD");
    }

    #[test]
    fn test_display_includes_code_and_name() {
        let err = SchemaError::unknown_table("Classes");
        let display = err.to_string();
        assert!(display.contains("GYM_UNKNOWN_TABLE"));
        assert!(display.contains("Classes"));
    }
}
