//! Employee handlers
//!
//! Implements employee account CRUD, status changes, and password management

use axum::{
    extract::{Path, Query},
    response::Json,
    Extension,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use crate::entity::employee::{self, EmployeeResponse, EmployeeStatus, Role};
use crate::entity::security_log::{EventType, NewSecurityLog};
use crate::error::{AppResult, OptionExt};
use crate::handlers::audit::service::log_security_event;
use crate::ident;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;

const BCRYPT_COST: u32 = 12;

/// Add employee request
#[derive(Debug, Deserialize)]
pub struct AddEmployeeRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    #[serde(default)]
    pub salary_rate: Decimal,
    /// Admin, HR or Employee; defaults to Employee
    pub role: Option<String>,
}

/// Update employee request
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary_rate: Option<Decimal>,
    pub role: Option<String>,
}

/// Set status request
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub id: i64,
    /// Active, Inactive or Suspended
    pub status: String,
}

/// Change password request (employee changes their own password)
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Reset password request (admin resets an employee's password)
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub id: i64,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

/// POST /api/employees/add
pub async fn add_employee(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<AddEmployeeRequest>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    authorize(&current_user, Capability::ManageEmployees)?;

    if req.username.is_empty() || req.password.is_empty() || req.name.is_empty() {
        return Ok(Json(ApiResponse::error(400, "Username, password and name are required")));
    }

    let role = match req.role.as_deref() {
        None => Role::Employee,
        Some(r) => match Role::parse(r) {
            Some(role) => role,
            None => return Ok(Json(ApiResponse::error(400, "Unknown role"))),
        },
    };

    let existing = employee::Entity::find()
        .filter(employee::Column::Username.eq(&req.username))
        .one(&*db)
        .await?;
    if existing.is_some() {
        return Ok(Json(ApiResponse::error(400, "Username already exists")));
    }

    let hashed_password = bcrypt::hash(&req.password, BCRYPT_COST)
        .map_err(|e| crate::error::AppError::Internal(format!("password hash failed: {}", e)))?;

    // The employee_id column is unique; regenerate and retry if a concurrent
    // creation claimed the same suffix.
    let db_conn = &*db;
    let req = &req;
    let hashed_password = &hashed_password;
    let model = ident::with_id_retry(|| async move {
        let employee_id = ident::next_employee_id(db_conn).await?;
        let now = Utc::now();
        let new_employee = employee::ActiveModel {
            employee_id: Set(employee_id),
            username: Set(req.username.clone()),
            password: Set(hashed_password.clone()),
            name: Set(req.name.clone()),
            email: Set(req.email.clone()),
            phone: Set(req.phone.clone()),
            department: Set(req.department.clone()),
            position: Set(req.position.clone()),
            salary_rate: Set(req.salary_rate),
            role: Set(role.as_str().to_string()),
            status: Set(EmployeeStatus::Active.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        new_employee.insert(db_conn).await
    })
    .await?;

    tracing::info!("Employee created: {} ({})", model.employee_id, model.username);

    Ok(Json(ApiResponse::success(EmployeeResponse::from(model))))
}

/// GET /api/employees
pub async fn list_employees(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<EmployeeResponse>>>> {
    authorize(&current_user, Capability::ViewDashboard)?;

    let employees = employee::Entity::find()
        .order_by_asc(employee::Column::EmployeeId)
        .all(&*db)
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(employees)))
}

/// GET /api/employees/:employee_id
pub async fn get_employee(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    authorize(&current_user, Capability::ViewDashboard)?;

    let model = employee::Entity::find()
        .filter(employee::Column::EmployeeId.eq(&employee_id))
        .one(&*db)
        .await?
        .ok_or_not_found("Employee not found")?;

    Ok(Json(ApiResponse::success(EmployeeResponse::from(model))))
}

/// POST /api/employees/update
pub async fn update_employee(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<EmployeeResponse>>> {
    authorize(&current_user, Capability::ManageEmployees)?;

    let model = employee::Entity::find_by_id(req.id)
        .one(&*db)
        .await?
        .ok_or_not_found("Employee not found")?;

    let role = match req.role.as_deref() {
        None => model.role(),
        Some(r) => match Role::parse(r) {
            Some(role) => role,
            None => return Ok(Json(ApiResponse::error(400, "Unknown role"))),
        },
    };

    let employee_code = model.employee_id.clone();
    let salary_rate = req.salary_rate.unwrap_or(model.salary_rate);

    let mut active: employee::ActiveModel = model.into();
    active.name = Set(req.name.clone());
    active.email = Set(req.email.clone());
    active.phone = Set(req.phone.clone());
    active.department = Set(req.department.clone());
    active.position = Set(req.position.clone());
    active.salary_rate = Set(salary_rate);
    active.role = Set(role.as_str().to_string());
    active.updated_at = Set(Utc::now());
    let updated = active.update(&*db).await?;

    log_security_event(
        NewSecurityLog::new(
            EventType::ProfileUpdate,
            format!("Profile of {} updated by {}", employee_code, current_user.username),
        )
        .with_user(current_user.id),
    );

    Ok(Json(ApiResponse::success(EmployeeResponse::from(updated))))
}

/// POST /api/employees/status
pub async fn set_employee_status(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(&current_user, Capability::ManageEmployees)?;

    let Some(status) = EmployeeStatus::parse(&req.status) else {
        return Ok(Json(ApiResponse::error(400, "Unknown status")));
    };

    let model = employee::Entity::find_by_id(req.id)
        .one(&*db)
        .await?
        .ok_or_not_found("Employee not found")?;

    let mut active: employee::ActiveModel = model.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now());
    active.update(&*db).await?;

    Ok(Json(ApiResponse::success_msg("Status updated")))
}

/// POST /api/employees/delete
pub async fn delete_employee(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(&current_user, Capability::ManageEmployees)?;

    if query.id == current_user.id {
        return Ok(Json(ApiResponse::error(400, "You cannot delete your own account")));
    }

    let model = employee::Entity::find_by_id(query.id)
        .one(&*db)
        .await?
        .ok_or_not_found("Employee not found")?;

    employee::Entity::delete_by_id(model.id).exec(&*db).await?;

    tracing::info!("Employee deleted: {}", model.employee_id);

    Ok(Json(ApiResponse::success_msg("Employee deleted")))
}

/// POST /api/employees/change-password
pub async fn change_password(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    if req.new_password.is_empty() {
        return Ok(Json(ApiResponse::error(400, "New password must not be empty")));
    }

    let model = employee::Entity::find_by_id(current_user.id)
        .one(&*db)
        .await?
        .ok_or_not_found("Employee not found")?;

    if !bcrypt::verify(&req.old_password, &model.password).unwrap_or(false) {
        return Ok(Json(ApiResponse::error(400, "Current password is incorrect")));
    }

    let hashed = bcrypt::hash(&req.new_password, BCRYPT_COST)
        .map_err(|e| crate::error::AppError::Internal(format!("password hash failed: {}", e)))?;

    let mut active: employee::ActiveModel = model.into();
    active.password = Set(hashed);
    active.updated_at = Set(Utc::now());
    active.update(&*db).await?;

    log_security_event(
        NewSecurityLog::new(
            EventType::PasswordChange,
            format!("User {} changed their password", current_user.username),
        )
        .with_user(current_user.id),
    );

    Ok(Json(ApiResponse::success_msg("Password changed")))
}

/// POST /api/employees/reset-password
pub async fn reset_password(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    authorize(&current_user, Capability::ManageEmployees)?;

    if req.password.is_empty() {
        return Ok(Json(ApiResponse::error(400, "Password must not be empty")));
    }

    let model = employee::Entity::find_by_id(req.id)
        .one(&*db)
        .await?
        .ok_or_not_found("Employee not found")?;

    let hashed = bcrypt::hash(&req.password, BCRYPT_COST)
        .map_err(|e| crate::error::AppError::Internal(format!("password hash failed: {}", e)))?;

    let employee_code = model.employee_id.clone();
    let mut active: employee::ActiveModel = model.into();
    active.password = Set(hashed);
    active.updated_at = Set(Utc::now());
    active.update(&*db).await?;

    log_security_event(
        NewSecurityLog::new(
            EventType::PasswordChange,
            format!("Password of {} reset by {}", employee_code, current_user.username),
        )
        .with_user(current_user.id),
    );

    Ok(Json(ApiResponse::success_msg("Password reset")))
}
