use kernel::model::{id::RoomId, room::Room};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub room_name: String,
    pub description: String,
    pub location: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            room_name,
            description,
            location,
            capacity,
            is_active,
            created_at,
            updated_at,
        } = value;
        Room {
            room_id,
            room_name,
            description,
            location,
            capacity,
            is_active,
            created_at,
            updated_at,
        }
    }
}
