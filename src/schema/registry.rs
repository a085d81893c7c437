//! Static schema registry
//!
//! Field lists and kinds for every table. Foreign keys are declared here
//! explicitly; only Attendance.Member_ID is enforced by default.

use super::types::{FieldDef, Table, TableSchema};

/// Number of `Field` columns in the file header
pub const HEADER_FIELD_COUNT: usize = 10;

/// Tag column name in the file header
pub const HEADER_TAG: &str = "Table";

const MEMBER: &[FieldDef] = &[
    FieldDef::unique("Member_ID"),
    FieldDef::plain("Name"),
    FieldDef::unique("Email"),
    FieldDef::plain("Health_Status"),
    FieldDef::plain("Gym_Location"),
    FieldDef::plain("Workout_Zone"),
    FieldDef::date("Join_Date"),
    FieldDef::plain("Membership_Type"),
    FieldDef::date("Subscription_Start"),
    FieldDef::date("Subscription_End"),
];

const ATTENDANCE: &[FieldDef] = &[
    FieldDef::plain("Attendance_ID"),
    FieldDef::reference("Member_ID", Table::Member, true),
    FieldDef::plain("Class_ID"),
    FieldDef::time_of_day("Date_Time"),
    FieldDef::plain("Attendance"),
];

const GYM_LOCATION: &[FieldDef] = &[
    FieldDef::plain("Location_ID"),
    FieldDef::plain("Name"),
    FieldDef::plain("Address"),
    FieldDef::unique("Phone"),
];

const WORKOUT_ZONE: &[FieldDef] = &[
    FieldDef::plain("Zone_ID"),
    FieldDef::reference("Location_ID", Table::GymLocation, false),
    FieldDef::plain("Name"),
    FieldDef::plain("Type"),
];

const PAYMENT: &[FieldDef] = &[
    FieldDef::plain("Payment_ID"),
    FieldDef::reference("Member_ID", Table::Member, false),
    FieldDef::plain("Amount"),
    FieldDef::date("Date"),
    FieldDef::plain("Method"),
];

const APPOINTMENT: &[FieldDef] = &[
    FieldDef::unique("Appointment_ID"),
    FieldDef::reference("Member_ID", Table::Member, false),
    FieldDef::reference("Trainer_ID", Table::Staff, false),
    FieldDef::plain("Type"),
    FieldDef::date("Date_Time"),
];

const STAFF: &[FieldDef] = &[
    FieldDef::plain("Staff_ID"),
    FieldDef::plain("Name"),
    FieldDef::plain("Role"),
    FieldDef::reference("Zone_ID", Table::WorkoutZone, false),
];

/// Name of the field that links rows to a member
pub const MEMBER_ID_FIELD: &str = "Member_ID";

/// Returns the schema for a table
pub fn schema_for(table: Table) -> TableSchema {
    let fields = match table {
        Table::Member => MEMBER,
        Table::Attendance => ATTENDANCE,
        Table::GymLocation => GYM_LOCATION,
        Table::WorkoutZone => WORKOUT_ZONE,
        Table::Payment => PAYMENT,
        Table::Appointment => APPOINTMENT,
        Table::Staff => STAFF,
    };
    TableSchema { table, fields }
}

/// Returns every table schema in registry order
pub fn all_schemas() -> impl Iterator<Item = TableSchema> {
    Table::ALL.into_iter().map(schema_for)
}

/// Header row written when the file is created
pub fn header_row() -> Vec<&'static str> {
    let mut header = Vec::with_capacity(HEADER_FIELD_COUNT + 1);
    header.push(HEADER_TAG);
    header.extend(std::iter::repeat("Field").take(HEADER_FIELD_COUNT));
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn test_no_table_exceeds_header_width() {
        for schema in all_schemas() {
            assert!(
                schema.arity() <= HEADER_FIELD_COUNT,
                "{} has {} fields",
                schema.table,
                schema.arity()
            );
        }
    }

    #[test]
    fn test_header_shape() {
        let header = header_row();
        assert_eq!(header.len(), 11);
        assert_eq!(header[0], "Table");
        assert!(header[1..].iter().all(|h| *h == "Field"));
    }

    #[test]
    fn test_only_attendance_member_reference_is_enforced() {
        let enforced: Vec<_> = all_schemas()
            .flat_map(|s| s.fields.iter().map(move |f| (s.table, f)))
            .filter(|(_, f)| matches!(f.kind, FieldKind::ForeignKey { enforced: true, .. }))
            .map(|(t, f)| (t, f.name))
            .collect();
        assert_eq!(enforced, vec![(Table::Attendance, "Member_ID")]);
    }

    #[test]
    fn test_declared_unique_fields() {
        let unique: Vec<_> = all_schemas()
            .flat_map(|s| s.fields.iter().map(move |f| (s.table, f)))
            .filter(|(_, f)| f.unique)
            .map(|(t, f)| (t, f.name))
            .collect();
        assert_eq!(
            unique,
            vec![
                (Table::Member, "Member_ID"),
                (Table::Member, "Email"),
                (Table::GymLocation, "Phone"),
                (Table::Appointment, "Appointment_ID"),
            ]
        );
    }

    #[test]
    fn test_member_schema_order() {
        let schema = schema_for(Table::Member);
        assert_eq!(schema.key_field().name, "Member_ID");
        assert_eq!(schema.position("Join_Date"), Some(6));
        assert_eq!(schema.position("Name"), Some(1));
    }
}
