//! Sequential human-readable IDs
//!
//! Employees and job applications carry IDs of the form PREFIX + zero-padded
//! integer (EMP001, APP0001). The next ID is derived by scanning the
//! lexicographically-last existing ID with the prefix and incrementing its
//! numeric suffix; no records or a malformed suffix restart the numbering at
//! 1 (the overwrite this can cause is inherited behavior, kept as-is).
//!
//! The ID columns are unique, so concurrent creations race on the same
//! candidate; callers insert inside [`with_id_retry`], which re-scans on a
//! unique-constraint violation.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};

use crate::entity::{application, employee};

/// EMP prefix, 3-digit suffix
pub const EMPLOYEE_PREFIX: &str = "EMP";
pub const EMPLOYEE_WIDTH: usize = 3;

/// APP prefix, 4-digit suffix
pub const APPLICATION_PREFIX: &str = "APP";
pub const APPLICATION_WIDTH: usize = 4;

/// Attempts before an insert loop gives up on unique-violation retries.
const MAX_ATTEMPTS: usize = 5;

/// Compute the successor of the last existing ID with the given prefix.
///
/// Zero-pads to `width`; suffixes beyond the width keep growing naturally
/// (EMP999 is followed by EMP1000).
pub fn next_in_sequence(last: Option<&str>, prefix: &str, width: usize) -> String {
    let num = last
        .and_then(|id| id.strip_prefix(prefix))
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);

    format!("{}{:0width$}", prefix, num, width = width)
}

/// Next employee ID (EMP001, ...) from the current table contents.
pub async fn next_employee_id(db: &DatabaseConnection) -> Result<String, DbErr> {
    let last = employee::Entity::find()
        .filter(employee::Column::EmployeeId.starts_with(EMPLOYEE_PREFIX))
        .order_by_desc(employee::Column::EmployeeId)
        .one(db)
        .await?;

    Ok(next_in_sequence(
        last.as_ref().map(|e| e.employee_id.as_str()),
        EMPLOYEE_PREFIX,
        EMPLOYEE_WIDTH,
    ))
}

/// Next application ID (APP0001, ...) from the current table contents.
pub async fn next_application_id(db: &DatabaseConnection) -> Result<String, DbErr> {
    let last = application::Entity::find()
        .filter(application::Column::ApplicationId.starts_with(APPLICATION_PREFIX))
        .order_by_desc(application::Column::ApplicationId)
        .one(db)
        .await?;

    Ok(next_in_sequence(
        last.as_ref().map(|a| a.application_id.as_str()),
        APPLICATION_PREFIX,
        APPLICATION_WIDTH,
    ))
}

/// Run a generate-then-insert closure, retrying on unique-constraint
/// violations so concurrent creations settle on distinct IDs.
pub async fn with_id_retry<T, F, Fut>(mut attempt: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, DbErr>>,
{
    let mut last_err = None;
    for _ in 0..MAX_ATTEMPTS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!("ID collision, regenerating: {}", e);
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or_else(|| DbErr::Custom("ID allocation retries exhausted".into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_id_starts_at_one() {
        assert_eq!(next_in_sequence(None, EMPLOYEE_PREFIX, EMPLOYEE_WIDTH), "EMP001");
        assert_eq!(
            next_in_sequence(None, APPLICATION_PREFIX, APPLICATION_WIDTH),
            "APP0001"
        );
    }

    #[test]
    fn test_increments_last_suffix() {
        assert_eq!(next_in_sequence(Some("EMP007"), "EMP", 3), "EMP008");
        assert_eq!(next_in_sequence(Some("APP0041"), "APP", 4), "APP0042");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(next_in_sequence(Some("EMP009"), "EMP", 3), "EMP010");
        assert_eq!(next_in_sequence(Some("EMP099"), "EMP", 3), "EMP100");
    }

    #[test]
    fn test_grows_past_padding_width() {
        assert_eq!(next_in_sequence(Some("EMP999"), "EMP", 3), "EMP1000");
    }

    #[test]
    fn test_malformed_suffix_restarts_at_one() {
        assert_eq!(next_in_sequence(Some("EMPabc"), "EMP", 3), "EMP001");
        assert_eq!(next_in_sequence(Some("XYZ123"), "EMP", 3), "EMP001");
    }
}
