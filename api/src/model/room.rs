use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    id::{BookingId, RoomId},
    room::Room,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[garde(length(min = 1, max = 100))]
    pub room_name: String,
    #[garde(skip)]
    pub description: String,
    #[garde(length(min = 1, max = 200))]
    pub location: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub description: String,
    pub location: String,
    pub capacity: i32,
    pub is_active: bool,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            room_id,
            room_name,
            description,
            location,
            capacity,
            is_active,
            created_at: _,
            updated_at: _,
        } = value;
        Self {
            room_id,
            room_name,
            description,
            location,
            capacity,
            is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Set while editing so the booking does not collide with itself.
    pub booking_id: Option<BookingId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_query_accepts_an_optional_booking_id() {
        let q: AvailabilityQuery = serde_json::from_value(serde_json::json!({
            "start": "2026-09-01T10:00:00Z",
            "end": "2026-09-01T11:00:00Z",
        }))
        .unwrap();
        assert!(q.booking_id.is_none());

        let id = BookingId::new();
        let q: AvailabilityQuery = serde_json::from_value(serde_json::json!({
            "start": "2026-09-01T10:00:00Z",
            "end": "2026-09-01T11:00:00Z",
            "bookingId": id.to_string(),
        }))
        .unwrap();
        assert_eq!(q.booking_id, Some(id));
    }
}
