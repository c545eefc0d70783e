//! Job application entity
//!
//! Table: applications
//!
//! Applications are submitted from the public careers form and reviewed by
//! HR; the human-readable `application_id` (APP0001) is what applicants use
//! to look up their status later.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::workflow::{ApplicationStatus, WorkflowStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Human-readable ID (APP0001), unique
    #[sea_orm(column_type = "String(Some(20))", unique)]
    pub application_id: String,

    #[sea_orm(column_type = "String(Some(255))")]
    pub full_name: String,

    #[sea_orm(column_type = "String(Some(254))")]
    pub email: String,

    #[sea_orm(column_type = "String(Some(20))")]
    pub phone: String,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    #[sea_orm(column_type = "String(Some(100))")]
    pub position_applied: String,

    /// Stored resume path relative to the data directory
    #[sea_orm(column_type = "String(Some(255))", nullable)]
    pub resume_file: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub work_experience: String,

    #[sea_orm(column_type = "Text")]
    pub education: String,

    #[sea_orm(column_type = "Text")]
    pub skills: String,

    /// Pending, Under Review, Accepted, Rejected
    #[sea_orm(column_type = "String(Some(20))")]
    pub status: String,

    pub applied_date: DateTimeUtc,

    #[sea_orm(nullable)]
    pub processed_by: Option<i64>,

    #[sea_orm(nullable)]
    pub processed_date: Option<DateTimeUtc>,

    #[sea_orm(column_type = "Text")]
    pub notes: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Option<ApplicationStatus> {
        ApplicationStatus::parse(&self.status)
    }
}

/// Applicant-facing status view (no internal notes or reviewer)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusLookupResponse {
    pub application_id: String,
    pub full_name: String,
    pub position_applied: String,
    pub status: String,
    pub applied_date: DateTimeUtc,
}

impl From<Model> for StatusLookupResponse {
    fn from(model: Model) -> Self {
        Self {
            application_id: model.application_id,
            full_name: model.full_name,
            position_applied: model.position_applied,
            status: model.status,
            applied_date: model.applied_date,
        }
    }
}
