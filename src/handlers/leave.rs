//! Leave request handlers
//!
//! Employees file leave requests; HR decides them through the shared
//! reviewable workflow.

use axum::{response::Json, Extension};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::collections::HashMap;

use crate::entity::employee;
use crate::entity::leave::{self, LeaveDuration, LeaveResponse, LeaveType};
use crate::error::{AppResult, OptionExt};
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;
use crate::workflow::{LeaveStatus, Review, WorkflowStatus};

/// New leave request
#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub leave_type: String,
    /// Full or Half; defaults to Full
    pub duration: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

/// Decision on a pending request
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub id: i64,
    /// Approved or Rejected
    pub status: String,
}

/// POST /api/leaves/request
pub async fn request_leave(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<LeaveRequest>,
) -> AppResult<Json<ApiResponse<LeaveResponse>>> {
    let Some(leave_type) = LeaveType::parse(&req.leave_type) else {
        return Ok(Json(ApiResponse::error(400, "Unknown leave type")));
    };
    let duration = match req.duration.as_deref() {
        None => LeaveDuration::Full,
        Some(d) => match LeaveDuration::parse(d) {
            Some(duration) => duration,
            None => return Ok(Json(ApiResponse::error(400, "Unknown leave duration"))),
        },
    };
    if req.end_date < req.start_date {
        return Ok(Json(ApiResponse::error(400, "End date must not be before start date")));
    }
    if req.reason.trim().is_empty() {
        return Ok(Json(ApiResponse::error(400, "A reason is required")));
    }

    let new_leave = leave::ActiveModel {
        employee_id: Set(current_user.id),
        leave_type: Set(leave_type.as_str().to_string()),
        duration: Set(duration.as_str().to_string()),
        start_date: Set(req.start_date),
        end_date: Set(req.end_date),
        reason: Set(req.reason.clone()),
        status: Set(LeaveStatus::Pending.as_str().to_string()),
        applied_at: Set(Utc::now()),
        processed_by: Set(None),
        processed_at: Set(None),
        ..Default::default()
    };
    let model = new_leave.insert(&*db).await?;

    tracing::info!(
        "Leave requested by {}: {} {} to {}",
        current_user.username,
        model.leave_type,
        model.start_date,
        model.end_date
    );

    Ok(Json(ApiResponse::success(LeaveResponse::from(model))))
}

/// GET /api/leaves/my
pub async fn my_leaves(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<LeaveResponse>>>> {
    let leaves = leave::Entity::find()
        .filter(leave::Column::EmployeeId.eq(current_user.id))
        .order_by_desc(leave::Column::AppliedAt)
        .all(&*db)
        .await?
        .into_iter()
        .map(LeaveResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(leaves)))
}

/// GET /api/leaves
pub async fn list_leaves(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<LeaveResponse>>>> {
    authorize(&current_user, Capability::ReviewLeaves)?;

    // Pending first, newest within each status
    let leaves = leave::Entity::find()
        .order_by_asc(leave::Column::Status)
        .order_by_desc(leave::Column::AppliedAt)
        .all(&*db)
        .await?;

    let employees: HashMap<i64, String> = employee::Entity::find()
        .all(&*db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let response = leaves
        .into_iter()
        .map(|l| {
            let name = employees.get(&l.employee_id).cloned();
            let resp = LeaveResponse::from(l);
            match name {
                Some(name) => resp.with_employee_name(name),
                None => resp,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/leaves/decide
pub async fn decide_leave(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<DecideRequest>,
) -> AppResult<Json<ApiResponse<LeaveResponse>>> {
    authorize(&current_user, Capability::ReviewLeaves)?;

    let Some(decision) = LeaveStatus::parse(&req.status) else {
        return Ok(Json(ApiResponse::error(400, "Unknown status")));
    };
    if decision.is_pending() {
        return Ok(Json(ApiResponse::error(400, "A decision must approve or reject")));
    }

    let model = leave::Entity::find_by_id(req.id)
        .one(&*db)
        .await?
        .ok_or_not_found("Leave request not found")?;

    // Only pending requests can be decided; there is no re-decision
    if !model.status().is_some_and(|s| s.is_pending()) {
        return Ok(Json(ApiResponse::error(400, "Leave request has already been processed")));
    }

    let review = Review::decide(decision, current_user.id);
    let mut active: leave::ActiveModel = model.into();
    active.status = Set(review.status);
    active.processed_by = Set(Some(review.processed_by));
    active.processed_at = Set(Some(review.processed_at));
    let updated = active.update(&*db).await?;

    tracing::info!(
        "Leave {} {} by {}",
        updated.id,
        updated.status,
        current_user.username
    );

    Ok(Json(ApiResponse::success(LeaveResponse::from(updated))))
}
