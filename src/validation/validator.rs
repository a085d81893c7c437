//! Row validator
//!
//! Checks, in order:
//! - one value per declared field
//! - no blank values
//! - date and time-of-day fields parse
//! - unique fields do not repeat within the table
//! - foreign keys point at an existing row (enforced references only)
//!
//! Every check re-reads the record file; nothing is cached between calls.

use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

use super::errors::{ValidationError, ValidationResult};
use crate::schema::{schema_for, FieldKind, SchemaError, Table, TableSchema};
use crate::storage::FlatStore;

/// Format of date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of time-of-day fields
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Knobs that change which references are enforced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Treat every declared foreign key as enforced
    pub enforce_all_foreign_keys: bool,
}

/// Validator that checks candidate rows against the schema and the store.
///
/// Validator does not mutate the store.
pub struct RecordValidator<'a> {
    store: &'a FlatStore,
    policy: ValidationPolicy,
}

impl<'a> RecordValidator<'a> {
    /// Creates a validator with the default policy.
    pub fn new(store: &'a FlatStore) -> Self {
        Self::with_policy(store, ValidationPolicy::default())
    }

    /// Creates a validator with an explicit policy.
    pub fn with_policy(store: &'a FlatStore, policy: ValidationPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns the first unique field whose candidate value already exists.
    ///
    /// Rows are visited in file order and fields in schema order; the first
    /// conflict wins.
    pub fn check_unique(
        &self,
        table: Table,
        candidate: &[String],
    ) -> ValidationResult<Option<&'static str>> {
        self.find_conflict(table, candidate, None)
    }

    fn find_conflict(
        &self,
        table: Table,
        candidate: &[String],
        exclude_key: Option<&str>,
    ) -> ValidationResult<Option<&'static str>> {
        let schema = schema_for(table);
        if !schema.fields.iter().any(|f| f.unique) {
            return Ok(None);
        }

        let rows = self
            .store
            .scan(table, |r| exclude_key.map_or(true, |k| r.key() != k))?;
        for row in rows {
            let row = row?;
            let conflict = schema.fields.iter().enumerate().find(|(idx, f)| {
                f.unique && candidate.get(*idx).is_some_and(|v| row.fields[*idx] == *v)
            });
            if let Some((_, field)) = conflict {
                return Ok(Some(field.name));
            }
        }
        Ok(None)
    }

    /// Checks that `value` names an existing row when `field` is an
    /// enforced reference.
    ///
    /// Fields without a declared reference, and advisory references under
    /// the default policy, always pass.
    pub fn check_foreign_key(
        &self,
        table: Table,
        field: &str,
        value: &str,
    ) -> ValidationResult<bool> {
        let def = schema_for(table)
            .field(field)
            .ok_or_else(|| SchemaError::unknown_field(table.tag(), field))?;

        match def.kind {
            FieldKind::ForeignKey { target, enforced }
                if enforced || self.policy.enforce_all_foreign_keys =>
            {
                Ok(self.store.find_by_key(target, value)?.is_some())
            }
            _ => Ok(true),
        }
    }

    /// Validates a row about to be added.
    pub fn validate_row(&self, table: Table, candidate: &[String]) -> ValidationResult<()> {
        self.validate(table, candidate, None)
    }

    /// Validates a row about to replace the one stored under `key`.
    ///
    /// The row being replaced does not count as a uniqueness conflict.
    pub fn validate_update(
        &self,
        table: Table,
        key: &str,
        candidate: &[String],
    ) -> ValidationResult<()> {
        self.validate(table, candidate, Some(key))
    }

    fn validate(
        &self,
        table: Table,
        candidate: &[String],
        exclude_key: Option<&str>,
    ) -> ValidationResult<()> {
        let result = self.run_checks(table, candidate, exclude_key);
        if let Err(ref e) = result {
            if e.is_rejection() {
                warn!(table = %table, code = e.code(), reason = %e, "row rejected");
            }
        }
        result
    }

    fn run_checks(
        &self,
        table: Table,
        candidate: &[String],
        exclude_key: Option<&str>,
    ) -> ValidationResult<()> {
        let schema = schema_for(table);
        check_fields(&schema, candidate)?;

        if let Some(field) = self.find_conflict(table, candidate, exclude_key)? {
            return Err(ValidationError::DuplicateValue(field.to_string()));
        }

        for (def, value) in schema.fields.iter().zip(candidate) {
            if def.target().is_some() && !self.check_foreign_key(table, def.name, value)? {
                return Err(ValidationError::DanglingReference(def.name.to_string()));
            }
        }

        Ok(())
    }
}

/// Store-independent checks: arity, blanks, and date formats.
pub fn check_fields(schema: &TableSchema, candidate: &[String]) -> ValidationResult<()> {
    if candidate.len() != schema.arity() {
        return Err(ValidationError::FieldCount {
            table: schema.table,
            expected: schema.arity(),
            actual: candidate.len(),
        });
    }

    if let Some(def) = schema
        .fields
        .iter()
        .zip(candidate)
        .find(|(_, v)| v.trim().is_empty())
        .map(|(def, _)| def)
    {
        return Err(ValidationError::MissingField(def.name.to_string()));
    }

    for (def, value) in schema.fields.iter().zip(candidate) {
        let parses = match def.kind {
            FieldKind::Date => NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok(),
            FieldKind::TimeOfDay => NaiveTime::parse_from_str(value, TIME_FORMAT).is_ok(),
            _ => true,
        };
        if !parses {
            return Err(ValidationError::InvalidDate(def.name.to_string()));
        }
    }

    Ok(())
}
