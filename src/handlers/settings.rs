//! System settings handlers
//!
//! Key/value configuration store, admin only.

use axum::{extract::Path, response::Json, Extension};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use crate::entity::setting;
use crate::error::{AppResult, OptionExt};
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;

/// Upsert setting request
#[derive(Debug, Deserialize)]
pub struct UpsertSettingRequest {
    pub setting_name: String,
    pub setting_value: String,
    #[serde(default)]
    pub description: String,
}

/// GET /api/settings
pub async fn list_settings(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<setting::Model>>>> {
    authorize(&current_user, Capability::ManageSettings)?;

    let settings = setting::Entity::find()
        .order_by_asc(setting::Column::SettingName)
        .all(&*db)
        .await?;

    Ok(Json(ApiResponse::success(settings)))
}

/// GET /api/settings/:name
pub async fn get_setting(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<setting::Model>>> {
    authorize(&current_user, Capability::ManageSettings)?;

    let model = setting::Entity::find()
        .filter(setting::Column::SettingName.eq(&name))
        .one(&*db)
        .await?
        .ok_or_not_found("Setting not found")?;

    Ok(Json(ApiResponse::success(model)))
}

/// POST /api/settings
pub async fn upsert_setting(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<UpsertSettingRequest>,
) -> AppResult<Json<ApiResponse<setting::Model>>> {
    authorize(&current_user, Capability::ManageSettings)?;

    let name = req.setting_name.trim();
    if name.is_empty() {
        return Ok(Json(ApiResponse::error(400, "Setting name is required")));
    }

    let existing = setting::Entity::find()
        .filter(setting::Column::SettingName.eq(name))
        .one(&*db)
        .await?;

    let model = match existing {
        Some(model) => {
            let mut active: setting::ActiveModel = model.into();
            active.setting_value = Set(req.setting_value.clone());
            if !req.description.is_empty() {
                active.description = Set(req.description.clone());
            }
            active.updated_by = Set(Some(current_user.id));
            active.updated_at = Set(Utc::now());
            active.update(&*db).await?
        }
        None => {
            let new_setting = setting::ActiveModel {
                setting_name: Set(name.to_string()),
                setting_value: Set(req.setting_value.clone()),
                description: Set(req.description.clone()),
                updated_by: Set(Some(current_user.id)),
                updated_at: Set(Utc::now()),
                ..Default::default()
            };
            new_setting.insert(&*db).await?
        }
    };

    tracing::info!("Setting {} updated by {}", model.setting_name, current_user.username);

    Ok(Json(ApiResponse::success(model)))
}
