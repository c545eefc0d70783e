//! Attendance handlers
//!
//! Kiosk punch clock plus record listings. The punch endpoint is public:
//! employees identify themselves by employee ID at a shared kiosk, with no
//! browser session.

use axum::{extract::Query, response::Json, Extension};
use chrono::{Local, NaiveDate};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entity::attendance::{self, AttendanceResponse, PunchState};
use crate::entity::employee;
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;

/// Punch request from the kiosk
#[derive(Debug, Deserialize)]
pub struct PunchRequest {
    pub employee_id: String,
}

/// Punch outcome kind
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchOutcome {
    TimedIn,
    TimedOut,
    /// Both punches already recorded; nothing changed
    AlreadyComplete,
}

/// Punch response rendered on the kiosk screen
#[derive(Debug, Serialize)]
pub struct PunchResponse {
    pub outcome: PunchOutcome,
    pub message: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub time_in: Option<chrono::NaiveTime>,
    pub time_out: Option<chrono::NaiveTime>,
}

/// POST /api/kiosk/punch
pub async fn punch(
    Extension(db): Extension<DbConn>,
    Json(req): Json<PunchRequest>,
) -> AppResult<Json<ApiResponse<PunchResponse>>> {
    let employee_id = req.employee_id.trim().to_uppercase();
    if employee_id.is_empty() {
        return Ok(Json(ApiResponse::error(400, "Employee ID is required")));
    }

    let Some(emp) = employee::Entity::find()
        .filter(employee::Column::EmployeeId.eq(&employee_id))
        .one(&*db)
        .await?
        .filter(employee::Model::is_active)
    else {
        return Ok(Json(ApiResponse::error(404, "Employee ID not found or inactive")));
    };

    // The punch day is the server's local civil date
    let now = Local::now();
    let today = now.date_naive();
    let now_time = now.time();

    let record = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(emp.id))
        .filter(attendance::Column::Date.eq(today))
        .one(&*db)
        .await?;

    let response = match PunchState::of(record) {
        PunchState::NoRecord => {
            let new_record = attendance::ActiveModel {
                employee_id: Set(emp.id),
                date: Set(today),
                time_in: Set(Some(now_time)),
                time_out: Set(None),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            };
            new_record.insert(&*db).await?;

            PunchResponse {
                outcome: PunchOutcome::TimedIn,
                message: format!("TIME-IN recorded at {}", now_time.format("%H:%M:%S")),
                employee_name: emp.name,
                date: today,
                time_in: Some(now_time),
                time_out: None,
            }
        }
        PunchState::TimedIn(record) => {
            let time_in = record.time_in;
            let mut active: attendance::ActiveModel = record.into();
            active.time_out = Set(Some(now_time));
            active.update(&*db).await?;

            PunchResponse {
                outcome: PunchOutcome::TimedOut,
                message: format!("TIME-OUT recorded at {}", now_time.format("%H:%M:%S")),
                employee_name: emp.name,
                date: today,
                time_in,
                time_out: Some(now_time),
            }
        }
        PunchState::TimedOut(record) => {
            // Informational, not an error
            PunchResponse {
                outcome: PunchOutcome::AlreadyComplete,
                message: "Already timed in and out today".to_string(),
                employee_name: emp.name,
                date: today,
                time_in: record.time_in,
                time_out: record.time_out,
            }
        }
    };

    tracing::info!("Punch by {}: {}", employee_id, response.message);

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/attendance/my
pub async fn my_attendance(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<AttendanceResponse>>>> {
    let records = attendance::Entity::find()
        .filter(attendance::Column::EmployeeId.eq(current_user.id))
        .order_by_desc(attendance::Column::Date)
        .all(&*db)
        .await?
        .into_iter()
        .map(AttendanceResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(records)))
}

/// Query parameters for the HR listing
#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    /// Restrict to one date (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
}

/// GET /api/attendance
pub async fn list_attendance(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<ApiResponse<Vec<AttendanceResponse>>>> {
    authorize(&current_user, Capability::ViewDashboard)?;

    let mut find = attendance::Entity::find();
    if let Some(date) = query.date {
        find = find.filter(attendance::Column::Date.eq(date));
    }
    let records = find
        .order_by_desc(attendance::Column::Date)
        .all(&*db)
        .await?;

    // Join in employee code and name for display
    let employees: HashMap<i64, (String, String)> = employee::Entity::find()
        .all(&*db)
        .await?
        .into_iter()
        .map(|e| (e.id, (e.employee_id, e.name)))
        .collect();

    let response = records
        .into_iter()
        .map(|r| {
            let employee = employees.get(&r.employee_id).cloned();
            let resp = AttendanceResponse::from(r);
            match employee {
                Some((code, name)) => resp.with_employee(code, name),
                None => resp,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(response)))
}
