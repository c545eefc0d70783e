//! Dashboard handlers
//!
//! Headline counts for the HR landing page.

use axum::{response::Json, Extension};
use chrono::Local;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;

use crate::entity::employee::EmployeeStatus;
use crate::entity::{application, attendance, employee, leave};
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;
use crate::workflow::{ApplicationStatus, LeaveStatus, WorkflowStatus};

/// Dashboard counts
#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub total_employees: u64,
    pub attendance_today: u64,
    pub pending_leaves: u64,
    pub pending_applications: u64,
}

/// GET /api/dashboard
pub async fn dashboard(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<DashboardCounts>>> {
    authorize(&current_user, Capability::ViewDashboard)?;

    let db = &*db;

    let total_employees = employee::Entity::find()
        .filter(employee::Column::Status.eq(EmployeeStatus::Active.as_str()))
        .count(db)
        .await?;

    let attendance_today = attendance::Entity::find()
        .filter(attendance::Column::Date.eq(Local::now().date_naive()))
        .count(db)
        .await?;

    let pending_leaves = leave::Entity::find()
        .filter(leave::Column::Status.eq(LeaveStatus::Pending.as_str()))
        .count(db)
        .await?;

    let pending_applications = application::Entity::find()
        .filter(application::Column::Status.eq(ApplicationStatus::Pending.as_str()))
        .count(db)
        .await?;

    Ok(Json(ApiResponse::success(DashboardCounts {
        total_employees,
        attendance_today,
        pending_leaves,
        pending_applications,
    })))
}
