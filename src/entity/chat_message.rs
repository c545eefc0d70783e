//! Chat message entity
//!
//! Table: chat_messages

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub room_id: i64,

    pub sender_id: i64,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub sent_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Message response with the sender's display name joined in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub sender_name: Option<String>,
    pub message: String,
    pub sent_at: DateTimeUtc,
}

impl From<Model> for MessageResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            sender_id: model.sender_id,
            sender_name: None,
            message: model.message,
            sent_at: model.sent_at,
        }
    }
}

impl MessageResponse {
    pub fn with_sender_name(mut self, name: String) -> Self {
        self.sender_name = Some(name);
        self
    }
}
