//! Leave request entity
//!
//! Table: leaves

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::workflow::{LeaveStatus, WorkflowStatus};

/// Leave type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveType {
    Sick,
    Vacation,
    Emergency,
    Unpaid,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Sick => "Sick",
            LeaveType::Vacation => "Vacation",
            LeaveType::Emergency => "Emergency",
            LeaveType::Unpaid => "Unpaid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Sick" => Some(LeaveType::Sick),
            "Vacation" => Some(LeaveType::Vacation),
            "Emergency" => Some(LeaveType::Emergency),
            "Unpaid" => Some(LeaveType::Unpaid),
            _ => None,
        }
    }
}

/// Full-day or half-day leave
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveDuration {
    Full,
    Half,
}

impl LeaveDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveDuration::Full => "Full",
            LeaveDuration::Half => "Half",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Full" => Some(LeaveDuration::Full),
            "Half" => Some(LeaveDuration::Half),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub employee_id: i64,

    /// Sick, Vacation, Emergency, Unpaid
    #[sea_orm(column_type = "String(Some(20))")]
    pub leave_type: String,

    /// Full or Half day
    #[sea_orm(column_type = "String(Some(10))")]
    pub duration: String,

    pub start_date: Date,

    pub end_date: Date,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

    /// Pending, Approved, Rejected
    #[sea_orm(column_type = "String(Some(20))")]
    pub status: String,

    pub applied_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub processed_by: Option<i64>,

    #[sea_orm(nullable)]
    pub processed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Option<LeaveStatus> {
        LeaveStatus::parse(&self.status)
    }
}

/// Leave response with the requester's display fields joined in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaveResponse {
    pub id: i64,
    pub employee_id: i64,
    pub leave_type: String,
    pub duration: String,
    pub start_date: Date,
    pub end_date: Date,
    pub reason: String,
    pub status: String,
    pub applied_at: DateTimeUtc,
    pub processed_by: Option<i64>,
    pub processed_at: Option<DateTimeUtc>,
    pub employee_name: Option<String>,
}

impl From<Model> for LeaveResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            leave_type: model.leave_type,
            duration: model.duration,
            start_date: model.start_date,
            end_date: model.end_date,
            reason: model.reason,
            status: model.status,
            applied_at: model.applied_at,
            processed_by: model.processed_by,
            processed_at: model.processed_at,
            employee_name: None,
        }
    }
}

impl LeaveResponse {
    pub fn with_employee_name(mut self, name: String) -> Self {
        self.employee_name = Some(name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_type_parse() {
        assert_eq!(LeaveType::parse("Vacation"), Some(LeaveType::Vacation));
        assert_eq!(LeaveType::parse("Holiday"), None);
    }

    #[test]
    fn test_duration_parse() {
        assert_eq!(LeaveDuration::parse("Half"), Some(LeaveDuration::Half));
        assert_eq!(LeaveDuration::parse(""), None);
    }
}
