//! Attendance entity
//!
//! Table: attendance
//!
//! One row per (employee, date). `time_out` is only ever set after
//! `time_in` exists; there is no correction workflow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub employee_id: i64,

    pub date: Date,

    #[sea_orm(nullable)]
    pub time_in: Option<Time>,

    #[sea_orm(nullable)]
    pub time_out: Option<Time>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Punch-clock state for one (employee, date)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PunchState {
    /// No attendance row for the day yet
    NoRecord,
    /// time_in recorded, time_out still open
    TimedIn(Model),
    /// Both punches recorded; further punches are no-ops
    TimedOut(Model),
}

impl PunchState {
    /// Derive the state from the day's row, if any.
    pub fn of(record: Option<Model>) -> Self {
        match record {
            None => PunchState::NoRecord,
            Some(r) if r.time_out.is_none() => PunchState::TimedIn(r),
            Some(r) => PunchState::TimedOut(r),
        }
    }
}

/// Attendance response with the employee's display fields joined in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub id: i64,
    pub employee_id: i64,
    pub date: Date,
    pub time_in: Option<Time>,
    pub time_out: Option<Time>,
    pub employee_code: Option<String>,
    pub employee_name: Option<String>,
}

impl From<Model> for AttendanceResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            date: model.date,
            time_in: model.time_in,
            time_out: model.time_out,
            employee_code: None,
            employee_name: None,
        }
    }
}

impl AttendanceResponse {
    pub fn with_employee(mut self, code: String, name: String) -> Self {
        self.employee_code = Some(code);
        self.employee_name = Some(name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn row(time_in: Option<NaiveTime>, time_out: Option<NaiveTime>) -> Model {
        Model {
            id: 1,
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            time_in,
            time_out,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_state_no_record() {
        assert_eq!(PunchState::of(None), PunchState::NoRecord);
    }

    #[test]
    fn test_state_timed_in() {
        let t = NaiveTime::from_hms_opt(8, 30, 0);
        let r = row(t, None);
        assert_eq!(PunchState::of(Some(r.clone())), PunchState::TimedIn(r));
    }

    #[test]
    fn test_state_timed_out() {
        let t_in = NaiveTime::from_hms_opt(8, 30, 0);
        let t_out = NaiveTime::from_hms_opt(17, 0, 0);
        let r = row(t_in, t_out);
        assert_eq!(PunchState::of(Some(r.clone())), PunchState::TimedOut(r));
    }
}
