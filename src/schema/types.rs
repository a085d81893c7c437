//! Table and field declarations
//!
//! Every table shares one physical file. A row's first physical field is the
//! table tag; the remaining fields follow the declared order below.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::SchemaError;

/// Logical tables stored in the flat file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "Member")]
    Member,
    #[serde(rename = "Attendance")]
    Attendance,
    #[serde(rename = "Gym_Location")]
    GymLocation,
    #[serde(rename = "Workout_Zone")]
    WorkoutZone,
    #[serde(rename = "Payment")]
    Payment,
    #[serde(rename = "Appointment")]
    Appointment,
    #[serde(rename = "Staff")]
    Staff,
}

impl Table {
    /// All tables in registry order
    pub const ALL: [Table; 7] = [
        Table::Member,
        Table::Attendance,
        Table::GymLocation,
        Table::WorkoutZone,
        Table::Payment,
        Table::Appointment,
        Table::Staff,
    ];

    /// Returns the tag written as the first physical field of each row
    pub fn tag(&self) -> &'static str {
        match self {
            Table::Member => "Member",
            Table::Attendance => "Attendance",
            Table::GymLocation => "Gym_Location",
            Table::WorkoutZone => "Workout_Zone",
            Table::Payment => "Payment",
            Table::Appointment => "Appointment",
            Table::Staff => "Staff",
        }
    }

    /// Parses a physical tag. Returns `None` for anything not in the registry.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.tag() == tag)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Table {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| SchemaError::unknown_table(s))
    }
}

/// How a field's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    Plain,
    /// ISO calendar date, `YYYY-MM-DD`
    Date,
    /// Time of day, `HH:MM:SS`, stamped from the clock on insert
    TimeOfDay,
    /// Key of a row in another table
    ForeignKey {
        /// Referenced table; the key is its first field
        target: Table,
        /// Whether a missing target rejects the write by default
        enforced: bool,
    },
}

impl FieldKind {
    /// Returns the kind name for listings and error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Plain => "plain",
            FieldKind::Date => "date",
            FieldKind::TimeOfDay => "time_of_day",
            FieldKind::ForeignKey { .. } => "foreign_key",
        }
    }
}

/// Declaration of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Field name as shown to users
    pub name: &'static str,
    /// Value interpretation
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Value must not repeat within the table
    pub unique: bool,
}

impl FieldDef {
    pub(crate) const fn plain(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Plain,
            unique: false,
        }
    }

    pub(crate) const fn unique(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Plain,
            unique: true,
        }
    }

    pub(crate) const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
            unique: false,
        }
    }

    pub(crate) const fn time_of_day(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::TimeOfDay,
            unique: false,
        }
    }

    pub(crate) const fn reference(name: &'static str, target: Table, enforced: bool) -> Self {
        Self {
            name,
            kind: FieldKind::ForeignKey { target, enforced },
            unique: false,
        }
    }

    /// Returns the referenced table if this field is a foreign key
    pub fn target(&self) -> Option<Table> {
        match self.kind {
            FieldKind::ForeignKey { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Ordered field list of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Owning table
    pub table: Table,
    /// Fields in physical order; the first one is the key
    pub fields: &'static [FieldDef],
}

impl TableSchema {
    /// Number of declared fields (excluding the tag)
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// The key field (always the first)
    pub fn key_field(&self) -> &'static FieldDef {
        &self.fields[0]
    }

    /// Position of a field by name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Field declaration by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_tag() {
        for table in Table::ALL {
            assert_eq!(Table::from_tag(table.tag()), Some(table));
        }
    }

    #[test]
    fn test_header_tag_is_not_a_table() {
        assert_eq!(Table::from_tag("Table"), None);
        assert!("Table".parse::<Table>().is_err());
    }

    #[test]
    fn test_serde_uses_physical_tag() {
        let json = serde_json::to_string(&Table::GymLocation).unwrap();
        assert_eq!(json, "\"Gym_Location\"");
    }

    #[test]
    fn test_field_kind_names() {
        assert_eq!(FieldKind::Plain.kind_name(), "plain");
        assert_eq!(FieldKind::Date.kind_name(), "date");
        assert_eq!(FieldKind::TimeOfDay.kind_name(), "time_of_day");
        assert_eq!(
            FieldKind::ForeignKey {
                target: Table::Member,
                enforced: true
            }
            .kind_name(),
            "foreign_key"
        );
    }
}
