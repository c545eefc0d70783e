//! Employee entity
//!
//! Table: employees
//!
//! Employees double as login accounts; the kiosk addresses them by the
//! human-readable `employee_id` (EMP001, EMP002, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Hr,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Hr => "HR",
            Role::Employee => "Employee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(Role::Admin),
            "HR" => Some(Role::Hr),
            "Employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::parse(value).unwrap_or(Role::Employee)
    }
}

/// Employee account status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Suspended,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
            EmployeeStatus::Suspended => "Suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(EmployeeStatus::Active),
            "Inactive" => Some(EmployeeStatus::Inactive),
            "Suspended" => Some(EmployeeStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Human-readable ID (EMP001), unique
    #[sea_orm(column_type = "String(Some(20))", unique)]
    pub employee_id: String,

    /// Login name, unique
    #[sea_orm(column_type = "String(Some(150))", unique)]
    pub username: String,

    /// bcrypt hash
    #[sea_orm(column_type = "String(Some(128))")]
    #[serde(skip_serializing)]
    pub password: String,

    /// Display name
    #[sea_orm(column_type = "String(Some(255))")]
    pub name: String,

    #[sea_orm(column_type = "String(Some(254))", nullable)]
    pub email: Option<String>,

    #[sea_orm(column_type = "String(Some(20))", nullable)]
    pub phone: Option<String>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub department: Option<String>,

    #[sea_orm(column_type = "String(Some(100))", nullable)]
    pub position: Option<String>,

    /// Hourly or monthly rate depending on local payroll practice
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub salary_rate: Decimal,

    /// Role: Admin, HR, Employee
    #[sea_orm(column_type = "String(Some(20))")]
    pub role: String,

    /// Status: Active, Inactive, Suspended
    #[sea_orm(column_type = "String(Some(20))")]
    pub status: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

// Cross-table lookups are done with explicit queries in the handlers.

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active.as_str()
    }
}

/// Employee response (no password hash)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub employee_id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary_rate: Decimal,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

impl From<Model> for EmployeeResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            username: model.username,
            name: model.name,
            email: model.email,
            phone: model.phone,
            department: model.department,
            position: model.position,
            salary_rate: model.salary_rate,
            role: model.role,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("HR"), Some(Role::Hr));
        assert_eq!(Role::Hr.as_str(), "HR");
        assert_eq!(Role::parse("hr"), None);
    }

    #[test]
    fn test_unknown_role_defaults_to_employee() {
        assert_eq!(Role::from("Intern"), Role::Employee);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(EmployeeStatus::parse("Suspended"), Some(EmployeeStatus::Suspended));
        assert_eq!(EmployeeStatus::parse("Fired"), None);
    }
}
