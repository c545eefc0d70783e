//! Room membership entity
//!
//! Table: room_memberships
//!
//! Membership is unique per (room, member).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room_memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub room_id: i64,

    pub member_id: i64,

    pub joined_at: DateTimeUtc,

    pub last_read_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Member response with the employee's display fields joined in
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member_id: i64,
    pub joined_at: DateTimeUtc,
    pub username: Option<String>,
    pub name: Option<String>,
}

impl From<Model> for MemberResponse {
    fn from(model: Model) -> Self {
        Self {
            member_id: model.member_id,
            joined_at: model.joined_at,
            username: None,
            name: None,
        }
    }
}

impl MemberResponse {
    pub fn with_employee(mut self, username: String, name: String) -> Self {
        self.username = Some(username);
        self.name = Some(name);
        self
    }
}
