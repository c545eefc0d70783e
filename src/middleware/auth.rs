//! Authentication middleware
//!
//! Provides session-based authentication for API routes

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;
use std::ops::Deref;
use tower_sessions::Session;

use crate::entity::employee::{self, Role};
use crate::entity::security_log::{EventType, NewSecurityLog};
use crate::handlers::audit::service::log_security_event;
use crate::state::AppState;

/// Session key for storing username
pub const SESSION_USER_KEY: &str = "user";
/// Session key for the last-activity timestamp (inactivity timeout)
pub const SESSION_TIMESTAMP_KEY: &str = "timestamp";

/// Database connection wrapper for use in handlers via Extension
#[derive(Clone)]
pub struct DbConn(pub DatabaseConnection);

impl Deref for DbConn {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extension to store current user in request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub employee_id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub status: String,
}

/// Paths that don't require authentication
fn is_public_path(path: &str) -> bool {
    // Only authenticate API routes; anything else is static content
    if !path.starts_with("/api") {
        return true;
    }

    // Auth endpoints
    if path == "/api/login" || path == "/api/logout" {
        return true;
    }
    // Attendance kiosk (employees punch without a browser session)
    if path == "/api/kiosk/punch" {
        return true;
    }
    // Public careers endpoints
    if path == "/api/applications/submit" || path == "/api/applications/status" {
        return true;
    }
    // Health check
    if path == "/api/health" {
        return true;
    }
    false
}

/// Authentication middleware
pub async fn auth_layer(
    State(state): State<AppState>,
    session: Session,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // All handlers access the db via Extension<DbConn>
    request.extensions_mut().insert(DbConn(state.db.clone()));

    // Skip auth for public paths
    if is_public_path(&path) {
        return next.run(request).await;
    }

    // Get username from session
    let username: Option<String> = session.get(SESSION_USER_KEY).await.unwrap_or(None);

    let Some(username) = username else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "unauthorized"})),
        ).into_response();
    };

    // Inactivity timeout
    let last_seen: Option<i64> = session.get(SESSION_TIMESTAMP_KEY).await.unwrap_or(None);
    let now = Utc::now().timestamp();
    if let Some(last_seen) = last_seen {
        if now - last_seen > state.config.session.timeout_secs {
            tracing::info!("Session expired for {}", username);
            log_security_event(NewSecurityLog::new(
                EventType::SessionTimeout,
                format!("Session for {} expired after inactivity", username),
            ));
            let _ = session.flush().await;
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "session expired"})),
            ).into_response();
        }
    }

    // Look up employee in database
    let user_result = employee::Entity::find()
        .filter(employee::Column::Username.eq(&username))
        .one(&state.db)
        .await;

    match user_result {
        Ok(Some(model)) => {
            let current_user = CurrentUser {
                id: model.id,
                employee_id: model.employee_id.clone(),
                username: model.username.clone(),
                name: model.name.clone(),
                email: model.email.clone(),
                role: model.role(),
                status: model.status,
            };

            // Refresh the activity timestamp
            if let Err(e) = session.insert(SESSION_TIMESTAMP_KEY, now).await {
                tracing::error!("Failed to refresh session timestamp: {}", e);
            }

            request.extensions_mut().insert(current_user);

            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!("Session user not found in database: {}", username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid_session"})),
            ).into_response()
        }
        Err(e) => {
            tracing::error!("Database error during auth: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal error"})),
            ).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/api/login"));
        assert!(is_public_path("/api/kiosk/punch"));
        assert!(is_public_path("/api/applications/submit"));
        assert!(is_public_path("/api/applications/status"));
        assert!(is_public_path("/api/health"));
        assert!(is_public_path("/index.html"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public_path("/api/employees"));
        assert!(!is_public_path("/api/leaves/decide"));
        assert!(!is_public_path("/api/applications"));
        assert!(!is_public_path("/api/applications/manage"));
    }
}
