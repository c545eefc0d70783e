//! Payroll entity
//!
//! Table: payroll
//!
//! One row per (employee, period). `net_pay` is computed once at creation
//! and stored, never recomputed from the components.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub employee_id: i64,

    /// Pay period key, e.g. "2025-01" or "Jan-2025"
    #[sea_orm(column_type = "String(Some(20))")]
    pub period: String,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub base_salary: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub overtime: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub deductions: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub bonuses: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub net_pay: Decimal,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Net pay from the pay components.
pub fn compute_net_pay(
    base_salary: Decimal,
    overtime: Decimal,
    bonuses: Decimal,
    deductions: Decimal,
) -> Decimal {
    base_salary + overtime + bonuses - deductions
}

/// Payroll response with the employee's display fields joined in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayrollResponse {
    pub id: i64,
    pub employee_id: i64,
    pub period: String,
    pub base_salary: Decimal,
    pub overtime: Decimal,
    pub deductions: Decimal,
    pub bonuses: Decimal,
    pub net_pay: Decimal,
    pub created_at: DateTimeUtc,
    pub employee_code: Option<String>,
    pub employee_name: Option<String>,
}

impl From<Model> for PayrollResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            period: model.period,
            base_salary: model.base_salary,
            overtime: model.overtime,
            deductions: model.deductions,
            bonuses: model.bonuses,
            net_pay: model.net_pay,
            created_at: model.created_at,
            employee_code: None,
            employee_name: None,
        }
    }
}

impl PayrollResponse {
    pub fn with_employee(mut self, code: String, name: String) -> Self {
        self.employee_code = Some(code);
        self.employee_name = Some(name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_net_pay() {
        let net = compute_net_pay(
            Decimal::new(3_000_00, 2),
            Decimal::new(250_50, 2),
            Decimal::new(100_00, 2),
            Decimal::new(75_25, 2),
        );
        assert_eq!(net, Decimal::new(3_275_25, 2));
    }
}
