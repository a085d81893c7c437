//! Schema registry for gymstore
//!
//! A static mapping from table to its ordered field declarations. Field
//! kinds and uniqueness are declared per table instead of being inferred
//! from field names.

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use registry::{
    all_schemas, header_row, schema_for, HEADER_FIELD_COUNT, HEADER_TAG, MEMBER_ID_FIELD,
};
pub use types::{FieldDef, FieldKind, Table, TableSchema};
