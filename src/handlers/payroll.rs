//! Payroll handlers
//!
//! One record per (employee, period); net pay is computed at creation and
//! stored as entered.

use axum::{response::Json, Extension};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::collections::HashMap;

use crate::entity::employee;
use crate::entity::payroll::{self, compute_net_pay, PayrollResponse};
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;

/// Create payroll record request
#[derive(Debug, Deserialize)]
pub struct CreatePayrollRequest {
    pub employee_id: i64,
    /// Pay period key, e.g. "2025-01"
    pub period: String,
    pub base_salary: Decimal,
    #[serde(default)]
    pub overtime: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    #[serde(default)]
    pub bonuses: Decimal,
}

/// POST /api/payroll/add
pub async fn create_payroll(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreatePayrollRequest>,
) -> AppResult<Json<ApiResponse<PayrollResponse>>> {
    authorize(&current_user, Capability::ManagePayroll)?;

    if req.period.trim().is_empty() {
        return Ok(Json(ApiResponse::error(400, "Pay period is required")));
    }

    let employee_exists = employee::Entity::find_by_id(req.employee_id)
        .one(&*db)
        .await?
        .is_some();
    if !employee_exists {
        return Ok(Json(ApiResponse::error(404, "Employee not found")));
    }

    let existing = payroll::Entity::find()
        .filter(payroll::Column::EmployeeId.eq(req.employee_id))
        .filter(payroll::Column::Period.eq(req.period.trim()))
        .one(&*db)
        .await?;
    if existing.is_some() {
        return Ok(Json(ApiResponse::error(
            400,
            "A payroll record for this employee and period already exists",
        )));
    }

    let net_pay = compute_net_pay(req.base_salary, req.overtime, req.bonuses, req.deductions);

    let new_record = payroll::ActiveModel {
        employee_id: Set(req.employee_id),
        period: Set(req.period.trim().to_string()),
        base_salary: Set(req.base_salary),
        overtime: Set(req.overtime),
        deductions: Set(req.deductions),
        bonuses: Set(req.bonuses),
        net_pay: Set(net_pay),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let model = new_record.insert(&*db).await?;

    tracing::info!(
        "Payroll record created for employee {} period {}",
        model.employee_id,
        model.period
    );

    Ok(Json(ApiResponse::success(PayrollResponse::from(model))))
}

/// GET /api/payroll
pub async fn list_payroll(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<PayrollResponse>>>> {
    authorize(&current_user, Capability::ManagePayroll)?;

    let records = payroll::Entity::find()
        .order_by_desc(payroll::Column::Period)
        .all(&*db)
        .await?;

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
            let resp = PayrollResponse::from(r);
            match employee {
                Some((code, name)) => resp.with_employee(code, name),
                None => resp,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/payroll/my
pub async fn my_payslips(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<PayrollResponse>>>> {
    let records = payroll::Entity::find()
        .filter(payroll::Column::EmployeeId.eq(current_user.id))
        .order_by_desc(payroll::Column::Period)
        .all(&*db)
        .await?
        .into_iter()
        .map(PayrollResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(records)))
}
