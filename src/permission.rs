//! Role-based authorization
//!
//! Every protected handler names the capability it needs and passes the
//! caller through [`authorize`]. This is a guard clause, not a policy
//! engine: the capability set is fixed and evaluated in one place.

use crate::entity::employee::Role;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;

/// What a protected operation requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Create, update, delete employee accounts (admin)
    ManageEmployees,
    /// Create and list payroll records (admin, HR)
    ManagePayroll,
    /// Approve or reject leave requests (admin, HR)
    ReviewLeaves,
    /// Review job applications (admin, HR)
    ReviewApplications,
    /// Query the security log (admin)
    ViewSecurityLogs,
    /// Read and write system settings (admin)
    ManageSettings,
    /// View staff lists and HR dashboard counts (admin, HR)
    ViewDashboard,
}

impl Role {
    /// Single source of truth for the role → capability mapping.
    ///
    /// Admin implies every HR capability.
    pub fn can(&self, capability: Capability) -> bool {
        use Capability::*;
        match capability {
            ManageEmployees | ViewSecurityLogs | ManageSettings => matches!(self, Role::Admin),
            ManagePayroll | ReviewLeaves | ReviewApplications | ViewDashboard => {
                matches!(self, Role::Admin | Role::Hr)
            }
        }
    }
}

/// User-visible denial message (rendered on the next page)
pub const ACCESS_DENIED: &str = "Access denied. Insufficient permissions.";

/// Check the caller's role against a required capability.
pub fn authorize(user: &CurrentUser, capability: Capability) -> AppResult<()> {
    if user.role.can(capability) {
        Ok(())
    } else {
        tracing::warn!(
            "Access denied: {} ({:?}) lacks {:?}",
            user.username,
            user.role,
            capability
        );
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_all_capabilities() {
        use Capability::*;
        for cap in [
            ManageEmployees,
            ManagePayroll,
            ReviewLeaves,
            ReviewApplications,
            ViewSecurityLogs,
            ManageSettings,
            ViewDashboard,
        ] {
            assert!(Role::Admin.can(cap), "admin should have {:?}", cap);
        }
    }

    #[test]
    fn test_hr_reviews_but_does_not_administer() {
        assert!(Role::Hr.can(Capability::ReviewLeaves));
        assert!(Role::Hr.can(Capability::ReviewApplications));
        assert!(Role::Hr.can(Capability::ManagePayroll));
        assert!(!Role::Hr.can(Capability::ManageEmployees));
        assert!(!Role::Hr.can(Capability::ViewSecurityLogs));
        assert!(!Role::Hr.can(Capability::ManageSettings));
    }

    #[test]
    fn test_employee_has_no_management_capability() {
        use Capability::*;
        for cap in [
            ManageEmployees,
            ManagePayroll,
            ReviewLeaves,
            ReviewApplications,
            ViewSecurityLogs,
            ManageSettings,
            ViewDashboard,
        ] {
            assert!(!Role::Employee.can(cap), "employee should not have {:?}", cap);
        }
    }
}
