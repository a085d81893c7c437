//! Row types for the shared record file
//!
//! Physical layout of one row:
//!
//! ```text
//! table_tag, field_1, field_2, ..., field_n
//! ```
//!
//! `n` is the table's declared arity. The header row starts with `Table` and
//! carries ten `Field` columns; data rows are not padded to that width, but
//! trailing empty columns are tolerated on read.

use csv::StringRecord;
use serde::Serialize;

use super::errors::{StorageError, StorageResult};
use crate::schema::{schema_for, Table, TableSchema, HEADER_TAG};

/// One logical row of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Owning table
    pub table: Table,
    /// Field values in schema order
    pub fields: Vec<String>,
}

impl Record {
    /// Create a record from owned values
    pub fn new(table: Table, fields: Vec<String>) -> Self {
        Self { table, fields }
    }

    /// Create a record from anything string-like
    pub fn from_values<I, S>(table: Table, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table,
            fields: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the table schema
    pub fn schema(&self) -> TableSchema {
        schema_for(self.table)
    }

    /// Value of the key (first) field
    pub fn key(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Value of a named field, if the table declares it
    pub fn get(&self, name: &str) -> Option<&str> {
        let idx = self.schema().position(name)?;
        self.fields.get(idx).map(String::as_str)
    }

    /// Replaces a named field's value. Returns false if the field is not declared.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.schema().position(name) {
            Some(idx) if idx < self.fields.len() => {
                self.fields[idx] = value.into();
                true
            }
            _ => false,
        }
    }

    /// Physical row: tag followed by field values
    pub(crate) fn to_row(&self) -> Vec<&str> {
        let mut row = Vec::with_capacity(self.fields.len() + 1);
        row.push(self.table.tag());
        row.extend(self.fields.iter().map(String::as_str));
        row
    }
}

/// A decoded physical row
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Row {
    /// The `Table, Field, ...` header
    Header,
    /// A data row of a known table
    Data(Record),
}

/// Decodes one physical row against the schema registry.
///
/// `line` is only used for error context.
pub(crate) fn decode_row(row: &StringRecord, line: u64) -> StorageResult<Row> {
    let tag = row.get(0).unwrap_or_default();
    if tag == HEADER_TAG {
        return Ok(Row::Header);
    }

    let table = Table::from_tag(tag).ok_or_else(|| {
        StorageError::malformed_row(line, format!("unknown table tag '{}'", tag))
    })?;
    let arity = schema_for(table).arity();
    let values: Vec<&str> = row.iter().skip(1).collect();

    if values.len() < arity {
        return Err(StorageError::malformed_row(
            line,
            format!(
                "{} row has {} fields, expected {}",
                table,
                values.len(),
                arity
            ),
        ));
    }
    if values[arity..].iter().any(|v| !v.is_empty()) {
        return Err(StorageError::malformed_row(
            line,
            format!(
                "{} row has {} non-empty fields, expected {}",
                table,
                values.iter().rposition(|v| !v.is_empty()).map_or(0, |p| p + 1),
                arity
            ),
        ));
    }

    Ok(Row::Data(Record::from_values(table, values[..arity].iter().copied())))
}
