use chrono::{DateTime, Utc};

use crate::model::id::RoomId;

pub mod event;

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub room_name: String,
    pub description: String,
    pub location: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
