//! Validation layer for gymstore
//!
//! Checks uniqueness and reference existence before a write is accepted.
//! Each call is stateless and re-derives its answer from the current file.

mod errors;
mod validator;

pub use errors::{ValidationError, ValidationResult};
pub use validator::{check_fields, RecordValidator, ValidationPolicy, DATE_FORMAT, TIME_FORMAT};
