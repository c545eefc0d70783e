//! Security log entity
//!
//! Table: security_logs
//!
//! Append-only audit trail of authentication and account events. Rows are
//! written through the background service in `handlers::audit`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Security event type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    LoginSuccess,
    LoginFailed,
    Logout,
    SessionTimeout,
    PasswordChange,
    ProfileUpdate,
    DataExport,
    SystemAccess,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::LoginSuccess => "LOGIN_SUCCESS",
            EventType::LoginFailed => "LOGIN_FAILED",
            EventType::Logout => "LOGOUT",
            EventType::SessionTimeout => "SESSION_TIMEOUT",
            EventType::PasswordChange => "PASSWORD_CHANGE",
            EventType::ProfileUpdate => "PROFILE_UPDATE",
            EventType::DataExport => "DATA_EXPORT",
            EventType::SystemAccess => "SYSTEM_ACCESS",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "security_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// One of the EventType strings
    #[sea_orm(column_type = "String(Some(50))")]
    pub event_type: String,

    /// Acting employee, if known (failed logins have none)
    #[sea_orm(nullable)]
    pub user_id: Option<i64>,

    #[sea_orm(column_type = "String(Some(64))", nullable)]
    pub ip_address: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub event_description: String,

    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Builder for a new security log entry
#[derive(Clone, Debug)]
pub struct NewSecurityLog {
    pub event_type: EventType,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub event_description: String,
}

impl NewSecurityLog {
    pub fn new(event_type: EventType, description: impl Into<String>) -> Self {
        Self {
            event_type,
            user_id: None,
            ip_address: None,
            user_agent: None,
            event_description: description.into(),
        }
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_client(mut self, ip: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip;
        self.user_agent = user_agent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_str() {
        assert_eq!(EventType::LoginFailed.as_str(), "LOGIN_FAILED");
        assert_eq!(EventType::SessionTimeout.as_str(), "SESSION_TIMEOUT");
    }

    #[test]
    fn test_builder() {
        let entry = NewSecurityLog::new(EventType::Logout, "User alice logged out")
            .with_user(7)
            .with_client(Some("10.0.0.1".into()), None);
        assert_eq!(entry.user_id, Some(7));
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
        assert!(entry.user_agent.is_none());
    }
}
