//! Authentication handlers
//!
//! Implements login, logout, and current user endpoints

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use tower_sessions::Session;

use crate::entity::employee::{self, EmployeeResponse};
use crate::entity::security_log::{EventType, NewSecurityLog};
use crate::handlers::audit::service::log_security_event;
use crate::middleware::auth::{CurrentUser, SESSION_TIMESTAMP_KEY, SESSION_USER_KEY};
use crate::middleware::DbConn;
use crate::routes::ApiResponse;

/// User-visible message for any failed login
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Client address and agent from request headers
fn client_info(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    (ip, user_agent)
}

fn log_failed_login(username: &str, headers: &HeaderMap) {
    let (ip, agent) = client_info(headers);
    log_security_event(
        NewSecurityLog::new(
            EventType::LoginFailed,
            format!("Failed login attempt for username: {}", username),
        )
        .with_client(ip, agent),
    );
}

/// POST /api/login
pub async fn login(
    Extension(db): Extension<DbConn>,
    session: Session,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    // Validate input
    if req.username.is_empty() || req.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "bad request"})),
        );
    }

    // Find employee in database
    let db = &*db;
    let user_result = employee::Entity::find()
        .filter(employee::Column::Username.eq(&req.username))
        .one(db)
        .await;

    let db_user = match user_result {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!("Login failed: user not found - {}", req.username);
            log_failed_login(&req.username, &headers);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": INVALID_CREDENTIALS})),
            );
        }
        Err(e) => {
            tracing::error!("Database error during login: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "internal error"})),
            );
        }
    };

    // Verify password using bcrypt
    let password_valid = bcrypt::verify(&req.password, &db_user.password).unwrap_or(false);
    if !password_valid {
        tracing::warn!("Login failed: wrong password - {}", req.username);
        log_failed_login(&req.username, &headers);
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": INVALID_CREDENTIALS})),
        );
    }

    // Only Active accounts may log in, even with correct credentials
    if !db_user.is_active() {
        tracing::warn!(
            "Login failed: account not active - {} ({})",
            req.username,
            db_user.status
        );
        log_failed_login(&req.username, &headers);
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": INVALID_CREDENTIALS})),
        );
    }

    // Save session
    if let Err(e) = session.insert(SESSION_USER_KEY, &req.username).await {
        tracing::error!("Failed to save session: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "internal error"})),
        );
    }
    if let Err(e) = session
        .insert(SESSION_TIMESTAMP_KEY, chrono::Utc::now().timestamp())
        .await
    {
        tracing::error!("Failed to save session timestamp: {}", e);
    }

    tracing::info!("User logged in: {}", req.username);
    let (ip, agent) = client_info(&headers);
    log_security_event(
        NewSecurityLog::new(
            EventType::LoginSuccess,
            format!("User {} logged in successfully", req.username),
        )
        .with_user(db_user.id)
        .with_client(ip, agent),
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": format!("Welcome back, {}!", db_user.name),
            "name": db_user.name,
            "role": db_user.role,
        })),
    )
}

/// POST /api/logout
pub async fn logout(session: Session, headers: HeaderMap) -> impl IntoResponse {
    // The logout route is public so an expired session can still land here
    let username: Option<String> = session.get(SESSION_USER_KEY).await.unwrap_or(None);

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(500, "internal error")),
        );
    }

    if let Some(username) = username {
        let (ip, agent) = client_info(&headers);
        log_security_event(
            NewSecurityLog::new(EventType::Logout, format!("User {} logged out", username))
                .with_client(ip, agent),
        );
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success_msg("You have been logged out successfully.")),
    )
}

/// GET /api/me
pub async fn current_user(
    Extension(db): Extension<DbConn>,
    Extension(user): Extension<CurrentUser>,
) -> (StatusCode, Json<serde_json::Value>) {
    match employee::Entity::find_by_id(user.id).one(&*db).await {
        Ok(Some(model)) => (
            StatusCode::OK,
            Json(serde_json::to_value(EmployeeResponse::from(model)).unwrap_or_default()),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "employee not found"})),
        ),
        Err(e) => {
            tracing::error!("Failed to load current user: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "internal error"})),
            )
        }
    }
}
