//! Read models returned by the handler

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::schema::Table;
use crate::storage::Record;

/// Every row linked to one member, grouped by table.
///
/// Returned by value; callers hold on to it for as long as they need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
    /// Member the rows belong to
    pub member_id: String,
    /// Rows per table; tables without a Member_ID field are absent
    pub tables: BTreeMap<Table, Vec<Record>>,
}

impl MemberSnapshot {
    /// Rows of one table, empty if none
    pub fn rows(&self, table: Table) -> &[Record] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or_default()
    }

    /// The member row itself
    pub fn member(&self) -> Option<&Record> {
        self.rows(Table::Member).first()
    }

    /// Total rows across all tables
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    /// Whether no rows reference the member
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One bar of the join-date chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinDatePoint {
    /// Member name (bar label)
    pub name: String,
    /// Join date (bar length)
    pub join_date: NaiveDate,
}

/// Outcome of a member delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Deleted member
    pub member_id: String,
    /// Rows removed across all tables
    pub removed: usize,
}
