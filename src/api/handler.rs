//! Gym handler
//!
//! The operations behind the management screens: add, update, cascading
//! member delete, member search, attendance view, member summary and the
//! join-date chart series. Every operation validates first and touches the
//! file only once the row is accepted.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::info;

use super::clock::{Clock, SystemClock};
use super::errors::{ApiError, ApiResult};
use super::views::{DeleteSummary, JoinDatePoint, MemberSnapshot};
use crate::schema::{schema_for, FieldKind, Table, MEMBER_ID_FIELD};
use crate::storage::{FlatStore, Record};
use crate::validation::{RecordValidator, ValidationPolicy, DATE_FORMAT, TIME_FORMAT};

/// Tables whose rows survive a member delete
const DELETE_EXCLUDED: &[Table] = &[Table::Appointment];

/// Handler over one record file
pub struct GymHandler<C = SystemClock> {
    store: FlatStore,
    clock: C,
    policy: ValidationPolicy,
}

impl GymHandler<SystemClock> {
    /// Create a handler using the wall clock
    pub fn new(store: FlatStore) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> GymHandler<C> {
    /// Create a handler with an explicit clock
    pub fn with_clock(store: FlatStore, clock: C) -> Self {
        Self {
            store,
            clock,
            policy: ValidationPolicy::default(),
        }
    }

    /// Replace the validation policy
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Underlying store
    pub fn store(&self) -> &FlatStore {
        &self.store
    }

    fn validator(&self) -> RecordValidator<'_> {
        RecordValidator::with_policy(&self.store, self.policy)
    }

    /// Validates and appends a new row.
    ///
    /// Time-of-day fields are overwritten with the clock's current time
    /// before validation.
    pub fn add_record(&self, table: Table, mut fields: Vec<String>) -> ApiResult<Record> {
        let schema = schema_for(table);
        let stamp = self.clock.now().format(TIME_FORMAT).to_string();
        for (def, value) in schema.fields.iter().zip(fields.iter_mut()) {
            if def.kind == FieldKind::TimeOfDay {
                value.clone_from(&stamp);
            }
        }

        self.validator().validate_row(table, &fields)?;

        let record = Record::new(table, fields);
        self.store.append(&record)?;
        info!(table = %table, key = record.key(), "record added");
        Ok(record)
    }

    /// Replaces every row of `table` stored under `key`.
    ///
    /// Returns the number of rows replaced.
    pub fn update_record(&self, table: Table, key: &str, fields: Vec<String>) -> ApiResult<usize> {
        if key.trim().is_empty() {
            return Err(ApiError::MissingKey);
        }
        if self.store.find_by_key(table, key)?.is_none() {
            return Err(ApiError::not_found(table, key));
        }

        self.validator().validate_update(table, key, &fields)?;

        let replacement = Record::new(table, fields);
        let mut replaced = 0;
        self.store.rewrite(|row| {
            if row.table == table && row.key() == key {
                replaced += 1;
                Some(replacement.clone())
            } else {
                Some(row)
            }
        })?;

        info!(table = %table, key, replaced, "record updated");
        Ok(replaced)
    }

    /// Deletes a member and every row that references it, except
    /// appointments.
    ///
    /// Nothing is rewritten when no row would be removed.
    pub fn delete_member(&self, member_id: &str) -> ApiResult<DeleteSummary> {
        let member_id = member_id.trim();
        if member_id.is_empty() {
            return Err(ApiError::MissingMemberId);
        }
        if !self.has_deletable_rows(member_id)? {
            return Err(ApiError::not_found(Table::Member, member_id));
        }

        let summary = self.store.rewrite(|row| {
            let linked = row.get(MEMBER_ID_FIELD) == Some(member_id);
            if linked && !DELETE_EXCLUDED.contains(&row.table) {
                None
            } else {
                Some(row)
            }
        })?;

        if summary.dropped == 0 {
            return Err(ApiError::not_found(Table::Member, member_id));
        }

        info!(member_id, removed = summary.dropped, "member deleted");
        Ok(DeleteSummary {
            member_id: member_id.to_string(),
            removed: summary.dropped,
        })
    }

    fn has_deletable_rows(&self, member_id: &str) -> ApiResult<bool> {
        for table in Table::ALL {
            if DELETE_EXCLUDED.contains(&table)
                || schema_for(table).position(MEMBER_ID_FIELD).is_none()
            {
                continue;
            }
            let hit = self
                .store
                .scan(table, |r| r.get(MEMBER_ID_FIELD) == Some(member_id))?
                .next()
                .transpose()?;
            if hit.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Collects every row whose Member_ID equals `member_id`.
    pub fn member_snapshot(&self, member_id: &str) -> ApiResult<MemberSnapshot> {
        let mut tables = BTreeMap::new();
        for table in Table::ALL {
            if schema_for(table).position(MEMBER_ID_FIELD).is_none() {
                continue;
            }
            let rows = self
                .store
                .scan(table, |r| r.get(MEMBER_ID_FIELD) == Some(member_id))?
                .collect::<Result<Vec<_>, _>>()?;
            tables.insert(table, rows);
        }
        Ok(MemberSnapshot {
            member_id: member_id.to_string(),
            tables,
        })
    }

    /// Looks up a member by id and returns its snapshot.
    ///
    /// `Ok(None)` means no such member.
    pub fn search_member(&self, term: &str) -> ApiResult<Option<MemberSnapshot>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ApiError::MissingSearchTerm);
        }
        if self.store.find_by_key(Table::Member, term)?.is_none() {
            return Ok(None);
        }
        self.member_snapshot(term).map(Some)
    }

    /// Attendance rows of one member, de-duplicated by the leading
    /// whitespace-separated token of `Date_Time`.
    ///
    /// Stamped rows hold only a time of day, so rows sharing a stamp
    /// collapse to one. The earliest row in file order wins.
    pub fn attendance(&self, member_id: &str) -> ApiResult<Vec<Record>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for row in self
            .store
            .scan(Table::Attendance, |r| r.get(MEMBER_ID_FIELD) == Some(member_id))?
        {
            let row = row?;
            let day = row
                .get("Date_Time")
                .and_then(|v| v.split_whitespace().next())
                .unwrap_or_default()
                .to_string();
            if seen.insert(day) {
                out.push(row);
            }
        }
        Ok(out)
    }

    /// Every member row.
    pub fn members_summary(&self) -> ApiResult<Vec<Record>> {
        Ok(self.store.rows(Table::Member)?)
    }

    /// `(name, join date)` pairs for the join-date chart.
    ///
    /// With `member_id`, only that member is included and an unknown id is
    /// an error.
    pub fn join_date_series(&self, member_id: Option<&str>) -> ApiResult<Vec<JoinDatePoint>> {
        let members = self
            .store
            .scan(Table::Member, |r| member_id.map_or(true, |id| r.key() == id))?
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(id) = member_id {
            if members.is_empty() {
                return Err(ApiError::not_found(Table::Member, id));
            }
        }

        members
            .iter()
            .map(|m| -> ApiResult<JoinDatePoint> {
                let raw = m.get("Join_Date").unwrap_or_default();
                let join_date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                    ApiError::InvalidStoredDate {
                        key: m.key().to_string(),
                        field: "Join_Date",
                        value: raw.to_string(),
                    }
                })?;
                Ok(JoinDatePoint {
                    name: m.get("Name").unwrap_or_default().to_string(),
                    join_date,
                })
            })
            .collect()
    }

    /// Every row of a table.
    pub fn list(&self, table: Table) -> ApiResult<Vec<Record>> {
        Ok(self.store.rows(table)?)
    }

    /// Key values selectable for a reference into `target`.
    pub fn foreign_key_options(&self, target: Table) -> ApiResult<Vec<String>> {
        Ok(self.store.foreign_key_options(target)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FixedClock;
    use crate::validation::ValidationError;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn member(id: &str, name: &str, email: &str, joined: &str) -> Vec<String> {
        values(&[
            id, name, email, "Good", "Downtown", "Cardio", joined, "Standard", joined, "2030-01-01",
        ])
    }

    fn handler(dir: &TempDir) -> GymHandler<FixedClock> {
        let store = FlatStore::open(dir.path().join("gym.csv")).unwrap();
        let now = NaiveDateTime::parse_from_str("2024-05-01 07:30:15", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        GymHandler::with_clock(store, FixedClock(now))
    }

    #[test]
    fn test_attendance_time_is_stamped() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();

        let rec = h
            .add_record(Table::Attendance, values(&["A1", "M1", "C1", "", "Present"]))
            .unwrap();

        assert_eq!(rec.get("Date_Time"), Some("07:30:15"));
    }

    #[test]
    fn test_update_missing_row() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);

        let err = h
            .update_record(Table::Member, "M1", member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn test_update_rewrites_row() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();

        let replaced = h
            .update_record(Table::Member, "M1", member("M1", "Ana B", "a@x.com", "2024-01-01"))
            .unwrap();

        assert_eq!(replaced, 1);
        let rows = h.list(Table::Member).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Name"), Some("Ana B"));
    }

    #[test]
    fn test_invalid_update_leaves_file() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();

        let err = h
            .update_record(Table::Member, "M1", member("M1", "", "a@x.com", "2024-01-01"))
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::MissingField(_))
        ));
        assert_eq!(h.list(Table::Member).unwrap()[0].get("Name"), Some("Ana"));
    }

    #[test]
    fn test_blank_inputs_rejected() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        assert!(matches!(h.delete_member(" "), Err(ApiError::MissingMemberId)));
        assert!(matches!(h.search_member(""), Err(ApiError::MissingSearchTerm)));
        assert!(matches!(
            h.update_record(Table::Staff, "", values(&["S1", "A", "B", "Z1"])),
            Err(ApiError::MissingKey)
        ));
    }

    #[test]
    fn test_attendance_dedup_by_leading_token() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        let store = h.store();
        store
            .append(&Record::new(
                Table::Attendance,
                values(&["A1", "M1", "C1", "2024-05-01 07:00:00", "Present"]),
            ))
            .unwrap();
        store
            .append(&Record::new(
                Table::Attendance,
                values(&["A2", "M1", "C2", "2024-05-01 18:00:00", "Present"]),
            ))
            .unwrap();
        store
            .append(&Record::new(
                Table::Attendance,
                values(&["A3", "M1", "C1", "2024-05-02 07:00:00", "Present"]),
            ))
            .unwrap();
        store
            .append(&Record::new(
                Table::Attendance,
                values(&["A4", "M2", "C1", "2024-05-02 07:00:00", "Present"]),
            ))
            .unwrap();

        let keys: Vec<_> = h
            .attendance("M1")
            .unwrap()
            .iter()
            .map(|r| r.key().to_string())
            .collect();
        assert_eq!(keys, vec!["A1", "A3"]);
    }

    #[test]
    fn test_attendance_collapses_equal_stamps() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();
        h.add_record(Table::Attendance, values(&["A1", "M1", "C1", "", "Present"]))
            .unwrap();
        h.add_record(Table::Attendance, values(&["A2", "M1", "C2", "", "Present"]))
            .unwrap();

        assert_eq!(h.list(Table::Attendance).unwrap().len(), 2);
        let rows = h.attendance("M1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key(), "A1");
        assert_eq!(rows[0].get("Date_Time"), Some("07:30:15"));
    }

    #[test]
    fn test_delete_trims_member_id() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();

        let summary = h.delete_member(" M1 ").unwrap();
        assert_eq!(summary.member_id, "M1");
        assert_eq!(summary.removed, 1);
        assert!(h.list(Table::Member).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_member_leaves_file() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();
        let before = std::fs::metadata(h.store().path()).unwrap().modified().unwrap();

        assert!(matches!(
            h.delete_member("M9"),
            Err(ApiError::NotFound { .. })
        ));
        let after = std::fs::metadata(h.store().path()).unwrap().modified().unwrap();
        assert_eq!(before, after);
        assert_eq!(h.list(Table::Member).unwrap().len(), 1);
    }

    #[test]
    fn test_join_date_series() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.add_record(Table::Member, member("M1", "Ana", "a@x.com", "2024-01-01"))
            .unwrap();
        h.add_record(Table::Member, member("M2", "Bo", "b@x.com", "2023-06-30"))
            .unwrap();

        let all = h.join_date_series(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "Bo");
        assert_eq!(
            all[1].join_date,
            NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()
        );

        let one = h.join_date_series(Some("M1")).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name, "Ana");

        assert!(matches!(
            h.join_date_series(Some("M9")),
            Err(ApiError::NotFound { .. })
        ));
    }

    #[test]
    fn test_join_date_series_reports_bad_stored_date() {
        let dir = TempDir::new().unwrap();
        let h = handler(&dir);
        h.store()
            .append(&Record::new(
                Table::Member,
                member("M1", "Ana", "a@x.com", "01/02/2024"),
            ))
            .unwrap();

        let err = h.join_date_series(None).unwrap_err();
        assert_eq!(err.code(), "GYM_INVALID_STORED_DATE");
    }
}
