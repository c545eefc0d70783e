//! Job application handlers
//!
//! The submit and status-lookup endpoints are public (applicants have no
//! account); review endpoints are gated to HR. Resumes are stored on disk
//! under the data directory with a timestamp-prefixed filename.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension,
};
use chrono::{Local, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::entity::application::{self, StatusLookupResponse};
use crate::error::{AppError, AppResult, OptionExt};
use crate::ident;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::permission::{authorize, Capability};
use crate::routes::ApiResponse;
use crate::state::AppState;
use crate::workflow::{ApplicationStatus, Review, WorkflowStatus};

/// Allow-listed resume extensions
const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// User-visible message when a lookup misses
const ID_NOT_FOUND: &str = "Application ID not found. Please check your ID and try again.";

/// Check if a resume filename carries an allow-listed extension
fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collected multipart form fields
#[derive(Debug, Default)]
struct SubmitForm {
    full_name: String,
    email: String,
    phone: String,
    address: String,
    position: String,
    work_experience: String,
    education: String,
    skills: String,
    resume_name: Option<String>,
    resume_data: Option<Vec<u8>>,
}

/// POST /api/applications/submit
///
/// Any failure inside the submission is surfaced as one generic
/// user-visible message; the applicant cannot act on internals.
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    multipart: Multipart,
) -> Json<ApiResponse<serde_json::Value>> {
    match submit_inner(&state, &db, multipart).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Application submission failed: {}", e);
            Json(ApiResponse::error(500, "Error submitting application. Please try again."))
        }
    }
}

async fn submit_inner(
    state: &AppState,
    db: &DbConn,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let mut form = SubmitForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "full_name" => form.full_name = field.text().await.unwrap_or_default(),
            "email" => form.email = field.text().await.unwrap_or_default(),
            "phone" => form.phone = field.text().await.unwrap_or_default(),
            "address" => form.address = field.text().await.unwrap_or_default(),
            "position" => form.position = field.text().await.unwrap_or_default(),
            "work_experience" => form.work_experience = field.text().await.unwrap_or_default(),
            "education" => form.education = field.text().await.unwrap_or_default(),
            "skills" => form.skills = field.text().await.unwrap_or_default(),
            "resume" => {
                form.resume_name = field.file_name().map(|s| s.to_string());
                if let Ok(bytes) = field.bytes().await {
                    form.resume_data = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    if form.full_name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.position.trim().is_empty()
    {
        return Ok(Json(ApiResponse::error(400, "Name, email and position are required")));
    }

    // Store the resume if one was attached with an allow-listed extension;
    // anything else is dropped, the application itself still goes through.
    let mut resume_path: Option<String> = None;
    if let (Some(original_name), Some(data)) = (&form.resume_name, &form.resume_data) {
        if allowed_file(original_name) && !data.is_empty() {
            // Keep only the final path component of the client-supplied name
            let base_name = original_name
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or("resume");
            let filename = format!(
                "resume_{}_{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                base_name
            );
            let resume_dir = state.config.resume_dir();
            tokio::fs::create_dir_all(&resume_dir).await?;
            tokio::fs::write(resume_dir.join(&filename), data).await?;
            resume_path = Some(format!("resumes/{}", filename));
        } else {
            tracing::warn!("Resume rejected (extension not allowed): {}", original_name);
        }
    }

    // The application_id column is unique; regenerate and retry if a
    // concurrent submission claimed the same suffix.
    let db_conn = &**db;
    let form = &form;
    let resume_path = &resume_path;
    let model = ident::with_id_retry(|| async move {
        let application_id = ident::next_application_id(db_conn).await?;
        let new_application = application::ActiveModel {
            application_id: Set(application_id),
            full_name: Set(form.full_name.clone()),
            email: Set(form.email.clone()),
            phone: Set(form.phone.clone()),
            address: Set(form.address.clone()),
            position_applied: Set(form.position.clone()),
            resume_file: Set(resume_path.clone()),
            work_experience: Set(form.work_experience.clone()),
            education: Set(form.education.clone()),
            skills: Set(form.skills.clone()),
            status: Set(ApplicationStatus::Pending.as_str().to_string()),
            applied_date: Set(Utc::now()),
            processed_by: Set(None),
            processed_date: Set(None),
            notes: Set(String::new()),
            ..Default::default()
        };
        new_application.insert(db_conn).await
    })
    .await?;

    tracing::info!("Application submitted: {}", model.application_id);

    Ok(Json(ApiResponse::success(serde_json::json!({
        "application_id": model.application_id,
    }))))
}

/// Status lookup request
#[derive(Debug, Deserialize)]
pub struct StatusLookupRequest {
    pub application_id: String,
}

/// POST /api/applications/status
pub async fn status_lookup(
    Extension(db): Extension<DbConn>,
    Json(req): Json<StatusLookupRequest>,
) -> AppResult<Json<ApiResponse<StatusLookupResponse>>> {
    let application = application::Entity::find()
        .filter(application::Column::ApplicationId.eq(req.application_id.trim()))
        .one(&*db)
        .await?;

    match application {
        Some(model) => Ok(Json(ApiResponse::success(StatusLookupResponse::from(model)))),
        None => Ok(Json(ApiResponse::error(404, ID_NOT_FOUND))),
    }
}

/// GET /api/applications
pub async fn list_applications(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<application::Model>>>> {
    authorize(&current_user, Capability::ReviewApplications)?;

    // Open statuses first, newest within each status
    let applications = application::Entity::find()
        .order_by_asc(application::Column::Status)
        .order_by_desc(application::Column::AppliedDate)
        .all(&*db)
        .await?;

    Ok(Json(ApiResponse::success(applications)))
}

/// GET /api/applications/:id
pub async fn view_application(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<application::Model>>> {
    authorize(&current_user, Capability::ReviewApplications)?;

    let model = application::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Application not found")?;

    Ok(Json(ApiResponse::success(model)))
}

/// Update status request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

/// POST /api/applications/:id/status
pub async fn update_application_status(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<application::Model>>> {
    authorize(&current_user, Capability::ReviewApplications)?;

    let Some(status) = ApplicationStatus::parse(&req.status) else {
        return Ok(Json(ApiResponse::error(400, "Unknown status")));
    };

    let model = application::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Application not found")?;

    let review = Review::decide(status, current_user.id);
    let mut active: application::ActiveModel = model.into();
    active.status = Set(review.status);
    active.notes = Set(req.notes.clone());
    active.processed_by = Set(Some(review.processed_by));
    active.processed_date = Set(Some(review.processed_at));
    let updated = active.update(&*db).await?;

    tracing::info!(
        "Application {} set to {} by {}",
        updated.application_id,
        updated.status,
        current_user.username
    );

    Ok(Json(ApiResponse::success(updated)))
}

/// GET /api/applications/:id/resume
pub async fn download_resume(
    State(state): State<AppState>,
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    authorize(&current_user, Capability::ReviewApplications)?;

    let model = application::Entity::find_by_id(id)
        .one(&*db)
        .await?
        .ok_or_not_found("Application not found")?;

    let relative = model
        .resume_file
        .ok_or_not_found("No resume on file for this application")?;
    let path = state.config.data_dir.join(&relative);

    let file = tokio::fs::File::open(&path).await?;
    let stream = ReaderStream::new(file);

    let filename = relative.rsplit('/').next().unwrap_or("resume").to_string();
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(allowed_file("cv.pdf"));
        assert!(allowed_file("resume.DOCX"));
        assert!(allowed_file("cover.letter.txt"));
        assert!(!allowed_file("malware.exe"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("archive.tar.gz"));
    }
}
