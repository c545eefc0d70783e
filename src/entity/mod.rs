//! Entity module - SeaORM entity definitions
//!
//! One module per database table.

pub mod application;
pub mod attendance;
pub mod chat_message;
pub mod chat_room;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod room_membership;
pub mod security_log;
pub mod setting;
