//! Chat room entity
//!
//! Table: chat_rooms

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    General,
    Group,
    Direct,
    Applicant,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::General => "general",
            RoomType::Group => "group",
            RoomType::Direct => "direct",
            RoomType::Applicant => "applicant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "general" => Some(RoomType::General),
            "group" => Some(RoomType::Group),
            "direct" => Some(RoomType::Direct),
            "applicant" => Some(RoomType::Applicant),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "String(Some(255))")]
    pub room_name: String,

    /// general, group, direct, applicant
    #[sea_orm(column_type = "String(Some(20))")]
    pub room_type: String,

    /// Random token permitting entry without prior membership, unique
    #[sea_orm(column_type = "String(Some(20))", unique)]
    pub join_code: String,

    #[sea_orm(nullable)]
    pub created_by: Option<i64>,

    pub created_at: DateTimeUtc,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_parse() {
        assert_eq!(RoomType::parse("applicant"), Some(RoomType::Applicant));
        assert_eq!(RoomType::parse("Applicant"), None);
    }
}
