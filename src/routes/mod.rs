use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::handlers;
use crate::middleware::auth_layer;
use crate::state::AppState;

pub mod health;

/// API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: true,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(_code: i32, message: impl Into<String>) -> Self {
        Self {
            code: false,
            message: message.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn success_msg(message: impl Into<String>) -> Self {
        Self {
            code: true,
            message: message.into(),
            data: None,
        }
    }
}

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    // Session store (in-memory for now)
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_http_only(true);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::current_user))
        // Config routes
        .route("/config", get(handlers::config::get_config))
        // Employee routes
        .route("/employees", get(handlers::employee::list_employees))
        .route("/employees/add", post(handlers::employee::add_employee))
        .route("/employees/update", post(handlers::employee::update_employee))
        .route("/employees/delete", post(handlers::employee::delete_employee))
        .route("/employees/status", post(handlers::employee::set_employee_status))
        .route("/employees/change-password", post(handlers::employee::change_password))
        .route("/employees/reset-password", post(handlers::employee::reset_password))
        .route("/employees/:employee_id", get(handlers::employee::get_employee))
        // Attendance kiosk and listings
        .route("/kiosk/punch", post(handlers::attendance::punch))
        .route("/attendance", get(handlers::attendance::list_attendance))
        .route("/attendance/my", get(handlers::attendance::my_attendance))
        // Leave routes
        .route("/leaves", get(handlers::leave::list_leaves))
        .route("/leaves/request", post(handlers::leave::request_leave))
        .route("/leaves/my", get(handlers::leave::my_leaves))
        .route("/leaves/decide", post(handlers::leave::decide_leave))
        // Payroll routes
        .route("/payroll", get(handlers::payroll::list_payroll))
        .route("/payroll/add", post(handlers::payroll::create_payroll))
        .route("/payroll/my", get(handlers::payroll::my_payslips))
        // Public careers endpoints + HR review
        .route(
            "/applications/submit",
            post(handlers::application::submit_application)
                .layer(DefaultBodyLimit::max(state.config.max_upload_size)),
        )
        .route("/applications/status", post(handlers::application::status_lookup))
        .route("/applications", get(handlers::application::list_applications))
        .route("/applications/:id", get(handlers::application::view_application))
        .route(
            "/applications/:id/status",
            post(handlers::application::update_application_status),
        )
        .route(
            "/applications/:id/resume",
            get(handlers::application::download_resume),
        )
        // Chat routes
        .route("/chat/rooms", get(handlers::chat::my_rooms))
        .route("/chat/rooms/create", post(handlers::chat::create_room))
        .route("/chat/rooms/join", post(handlers::chat::join_room))
        .route("/chat/rooms/:id/members", get(handlers::chat::room_members))
        .route(
            "/chat/rooms/:id/messages",
            get(handlers::chat::list_messages).post(handlers::chat::post_message),
        )
        // Settings routes
        .route(
            "/settings",
            get(handlers::settings::list_settings).post(handlers::settings::upsert_setting),
        )
        .route("/settings/:name", get(handlers::settings::get_setting))
        // Security log routes
        .route("/security-logs", get(handlers::audit::query_security_logs))
        // Dashboard
        .route("/dashboard", get(handlers::dashboard::dashboard));

    Router::new()
        .nest("/api", api_routes)
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Fallback handler for 404
pub async fn fallback() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(404, "Not Found")),
    )
}
