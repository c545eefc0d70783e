//! Chat handlers
//!
//! Rooms, join-code entry, memberships and messages. This is record-keeping
//! only; there is no real-time transport, clients poll the message list.

use axum::{
    extract::Path,
    response::Json,
    Extension,
};
use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::collections::HashMap;

use crate::entity::chat_message::{self, MessageResponse};
use crate::entity::chat_room::{self, RoomType};
use crate::entity::employee;
use crate::entity::room_membership::{self, MemberResponse};
use crate::error::{AppResult, OptionExt};
use crate::ident::with_id_retry;
use crate::middleware::auth::CurrentUser;
use crate::middleware::DbConn;
use crate::routes::ApiResponse;

/// Join code alphabet and length
const JOIN_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const JOIN_CODE_LEN: usize = 8;

/// Generate a random join code (8 chars, A-Z and digits)
fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_CHARSET[rng.gen_range(0..JOIN_CODE_CHARSET.len())] as char)
        .collect()
}

/// Create room request
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub room_name: String,
    /// general, group, direct, applicant; defaults to group
    pub room_type: Option<String>,
}

/// Join room request
#[derive(Debug, Deserialize)]
pub struct JoinRoomRequest {
    pub join_code: String,
}

/// Post message request
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub message: String,
}

/// Membership row for the caller in a room, if any
async fn find_membership(
    db: &sea_orm::DatabaseConnection,
    room_id: i64,
    member_id: i64,
) -> Result<Option<room_membership::Model>, sea_orm::DbErr> {
    room_membership::Entity::find()
        .filter(room_membership::Column::RoomId.eq(room_id))
        .filter(room_membership::Column::MemberId.eq(member_id))
        .one(db)
        .await
}

/// POST /api/chat/rooms/create
pub async fn create_room(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<Json<ApiResponse<chat_room::Model>>> {
    if req.room_name.trim().is_empty() {
        return Ok(Json(ApiResponse::error(400, "Room name is required")));
    }
    let room_type = match req.room_type.as_deref() {
        None => RoomType::Group,
        Some(t) => match RoomType::parse(t) {
            Some(room_type) => room_type,
            None => return Ok(Json(ApiResponse::error(400, "Unknown room type"))),
        },
    };

    // The join_code column is unique; regenerate on the (rare) collision.
    let db_conn = &*db;
    let req = &req;
    let creator_id = current_user.id;
    let room = with_id_retry(|| async move {
        let new_room = chat_room::ActiveModel {
            room_name: Set(req.room_name.trim().to_string()),
            room_type: Set(room_type.as_str().to_string()),
            join_code: Set(generate_join_code()),
            created_by: Set(Some(creator_id)),
            created_at: Set(Utc::now()),
            is_active: Set(true),
            ..Default::default()
        };
        new_room.insert(db_conn).await
    })
    .await?;

    // The creator is a member from the start
    let now = Utc::now();
    let membership = room_membership::ActiveModel {
        room_id: Set(room.id),
        member_id: Set(current_user.id),
        joined_at: Set(now),
        last_read_at: Set(now),
        ..Default::default()
    };
    membership.insert(&*db).await?;

    tracing::info!("Chat room created: {} ({})", room.room_name, room.join_code);

    Ok(Json(ApiResponse::success(room)))
}

/// POST /api/chat/rooms/join
pub async fn join_room(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<JoinRoomRequest>,
) -> AppResult<Json<ApiResponse<chat_room::Model>>> {
    let code = req.join_code.trim().to_uppercase();

    let room = chat_room::Entity::find()
        .filter(chat_room::Column::JoinCode.eq(&code))
        .filter(chat_room::Column::IsActive.eq(true))
        .one(&*db)
        .await?
        .ok_or_not_found("No active room with that join code")?;

    // Membership is unique per (room, member); rejoining is informational
    if find_membership(&db, room.id, current_user.id).await?.is_some() {
        return Ok(Json(ApiResponse {
            code: true,
            message: "Already a member of this room".to_string(),
            data: Some(room),
        }));
    }

    let now = Utc::now();
    let membership = room_membership::ActiveModel {
        room_id: Set(room.id),
        member_id: Set(current_user.id),
        joined_at: Set(now),
        last_read_at: Set(now),
        ..Default::default()
    };
    membership.insert(&*db).await?;

    tracing::info!("{} joined room {}", current_user.username, room.room_name);

    Ok(Json(ApiResponse::success(room)))
}

/// GET /api/chat/rooms
pub async fn my_rooms(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<Vec<chat_room::Model>>>> {
    let memberships = room_membership::Entity::find()
        .filter(room_membership::Column::MemberId.eq(current_user.id))
        .all(&*db)
        .await?;

    let room_ids: Vec<i64> = memberships.iter().map(|m| m.room_id).collect();
    let rooms = chat_room::Entity::find()
        .filter(chat_room::Column::Id.is_in(room_ids))
        .filter(chat_room::Column::IsActive.eq(true))
        .order_by_asc(chat_room::Column::RoomName)
        .all(&*db)
        .await?;

    Ok(Json(ApiResponse::success(rooms)))
}

/// GET /api/chat/rooms/:id/members
pub async fn room_members(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(room_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<MemberResponse>>>> {
    if find_membership(&db, room_id, current_user.id).await?.is_none() {
        return Ok(Json(ApiResponse::error(403, "You are not a member of this room")));
    }

    let memberships = room_membership::Entity::find()
        .filter(room_membership::Column::RoomId.eq(room_id))
        .order_by_asc(room_membership::Column::JoinedAt)
        .all(&*db)
        .await?;

    let employees: HashMap<i64, (String, String)> = employee::Entity::find()
        .all(&*db)
        .await?
        .into_iter()
        .map(|e| (e.id, (e.username, e.name)))
        .collect();

    let members = memberships
        .into_iter()
        .map(|m| {
            let employee = employees.get(&m.member_id).cloned();
            let resp = MemberResponse::from(m);
            match employee {
                Some((username, name)) => resp.with_employee(username, name),
                None => resp,
            }
        })
        .collect();

    Ok(Json(ApiResponse::success(members)))
}

/// POST /api/chat/rooms/:id/messages
pub async fn post_message(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(room_id): Path<i64>,
    Json(req): Json<PostMessageRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    if req.message.trim().is_empty() {
        return Ok(Json(ApiResponse::error(400, "Message must not be empty")));
    }

    if find_membership(&db, room_id, current_user.id).await?.is_none() {
        return Ok(Json(ApiResponse::error(403, "You are not a member of this room")));
    }

    let new_message = chat_message::ActiveModel {
        room_id: Set(room_id),
        sender_id: Set(current_user.id),
        message: Set(req.message.trim().to_string()),
        sent_at: Set(Utc::now()),
        ..Default::default()
    };
    let model = new_message.insert(&*db).await?;

    let response = MessageResponse::from(model).with_sender_name(current_user.name.clone());

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/chat/rooms/:id/messages
pub async fn list_messages(
    Extension(db): Extension<DbConn>,
    Extension(current_user): Extension<CurrentUser>,
    Path(room_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<MessageResponse>>>> {
    let Some(membership) = find_membership(&db, room_id, current_user.id).await? else {
        return Ok(Json(ApiResponse::error(403, "You are not a member of this room")));
    };

    let messages = chat_message::Entity::find()
        .filter(chat_message::Column::RoomId.eq(room_id))
        .order_by_asc(chat_message::Column::SentAt)
        .all(&*db)
        .await?;

    let employees: HashMap<i64, String> = employee::Entity::find()
        .all(&*db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let response = messages
        .into_iter()
        .map(|m| {
            let name = employees.get(&m.sender_id).cloned();
            let resp = MessageResponse::from(m);
            match name {
                Some(name) => resp.with_sender_name(name),
                None => resp,
            }
        })
        .collect();

    // Reading the room advances the member's read marker
    let mut active: room_membership::ActiveModel = membership.into();
    active.last_read_at = Set(Utc::now());
    active.update(&*db).await?;

    Ok(Json(ApiResponse::success(response)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_code_shape() {
        let code = generate_join_code();
        assert_eq!(code.len(), JOIN_CODE_LEN);
        assert!(code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn test_join_codes_vary() {
        // Two draws colliding by chance is ~1 in 2.8e12
        assert_ne!(generate_join_code(), generate_join_code());
    }
}
