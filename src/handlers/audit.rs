//! Security log handlers
//!
//! Query endpoint for the audit trail plus the background writer service
//! every other handler logs through. The trail is append-only; there is no
//! delete endpoint.

use axum::{extract::Query, response::Json, Extension};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entity::security_log;
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};

/// Query parameters for log pagination
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

/// Log entry response
#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub id: i64,
    pub event_type: String,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub event_description: String,
    pub timestamp: sea_orm::prelude::DateTimeUtc,
}

impl From<security_log::Model> for LogResponse {
    fn from(m: security_log::Model) -> Self {
        Self {
            id: m.id,
            event_type: m.event_type,
            user_id: m.user_id,
            ip_address: m.ip_address,
            user_agent: m.user_agent,
            event_description: m.event_description,
            timestamp: m.timestamp,
        }
    }
}

/// Query response with pagination
#[derive(Debug, Serialize)]
pub struct LogQueryResponse {
    pub logs: Vec<LogResponse>,
    pub total: u64,
}

/// GET /api/security-logs
pub async fn query_security_logs(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<LogQueryResponse>> {
    authorize(&current_user, Capability::ViewSecurityLogs)?;

    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);
    let offset = (page - 1) * page_size;

    // Newest first, matching the trail's reverse-chronological listing
    let logs = security_log::Entity::find()
        .order_by_desc(security_log::Column::Timestamp)
        .offset(offset)
        .limit(page_size)
        .all(&*db)
        .await?
        .into_iter()
        .map(LogResponse::from)
        .collect();

    let total = security_log::Entity::find().count(&*db).await?;

    Ok(Json(LogQueryResponse { logs, total }))
}

/// Service for appending security log entries
pub mod service {
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, Set};
    use tokio::sync::mpsc;

    use crate::entity::security_log::{self, NewSecurityLog};

    /// Global log channel
    static LOG_TX: std::sync::OnceLock<mpsc::Sender<NewSecurityLog>> = std::sync::OnceLock::new();

    /// Initialize the security log service
    /// This function is idempotent - calling it multiple times is safe
    pub fn init(db: sea_orm::DatabaseConnection) {
        if LOG_TX.get().is_some() {
            tracing::debug!("Security log service already initialized, skipping");
            return;
        }

        let (tx, mut rx) = mpsc::channel::<NewSecurityLog>(200);
        if LOG_TX.set(tx).is_err() {
            // Another thread initialized it first, that's fine
            tracing::debug!("Security log service initialized by another thread");
            return;
        }

        // Spawn background task to process log entries
        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                let log = security_log::ActiveModel {
                    event_type: Set(entry.event_type.as_str().to_string()),
                    user_id: Set(entry.user_id),
                    ip_address: Set(entry.ip_address),
                    user_agent: Set(entry.user_agent),
                    event_description: Set(entry.event_description),
                    timestamp: Set(Utc::now()),
                    ..Default::default()
                };

                if let Err(e) = log.insert(&db).await {
                    tracing::error!("Failed to write security log: {}", e);
                }
            }
        });
    }

    /// Append a security log entry
    pub fn log_security_event(entry: NewSecurityLog) {
        if let Some(tx) = LOG_TX.get() {
            if tx.try_send(entry).is_err() {
                tracing::warn!("Security log channel is full, entry dropped");
            }
        } else {
            tracing::warn!(
                "Security log service not initialized, entry dropped: {} - {}",
                entry.event_type.as_str(),
                entry.event_description
            );
        }
    }
}
