use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        window::TimeWindow,
        Booking, BookingHistory, BookingRoom, BookingStatus,
    },
    id::{BookingId, RoomId, UserId},
};
use serde::{Deserialize, Serialize};
use strum::VariantNames;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, VariantNames)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatusName {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl From<BookingStatus> for BookingStatusName {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Approved => Self::Approved,
            BookingStatus::Rejected => Self::Rejected,
            BookingStatus::Cancelled => Self::Cancelled,
            BookingStatus::Completed => Self::Completed,
        }
    }
}

impl From<BookingStatusName> for BookingStatus {
    fn from(value: BookingStatusName) -> Self {
        match value {
            BookingStatusName::Pending => Self::Pending,
            BookingStatusName::Approved => Self::Approved,
            BookingStatusName::Rejected => Self::Rejected,
            BookingStatusName::Cancelled => Self::Cancelled,
            BookingStatusName::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    pub description: String,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub participants: i32,
}

#[derive(new)]
pub struct CreateBookingRequestWithUser(pub UserId, pub CreateBookingRequest);

impl From<CreateBookingRequestWithUser> for CreateBooking {
    fn from(value: CreateBookingRequestWithUser) -> Self {
        let CreateBookingRequestWithUser(
            user_id,
            CreateBookingRequest {
                room_id,
                title,
                description,
                start_time,
                end_time,
                participants,
            },
        ) = value;
        CreateBooking::new(
            room_id,
            user_id,
            title,
            description,
            TimeWindow::new(start_time, end_time),
            participants,
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    pub description: String,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(skip)]
    pub end_time: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub participants: i32,
}

#[derive(new)]
pub struct UpdateBookingRequestWithIds(
    pub BookingId,
    pub UserId,
    pub UpdateBookingRequest,
);

impl From<UpdateBookingRequestWithIds> for UpdateBooking {
    fn from(value: UpdateBookingRequestWithIds) -> Self {
        let UpdateBookingRequestWithIds(
            booking_id,
            user_id,
            UpdateBookingRequest {
                title,
                description,
                start_time,
                end_time,
                participants,
            },
        ) = value;
        UpdateBooking::new(
            booking_id,
            user_id,
            title,
            description,
            TimeWindow::new(start_time, end_time),
            participants,
        )
    }
}

/// Filters for the caller's booking list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub status: Option<BookingStatusName>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    #[garde(skip)]
    pub status: BookingStatusName,
    #[garde(skip)]
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub participants: i32,
    pub status: BookingStatusName,
    pub notes: String,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room: BookingRoomResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            booked_by,
            title,
            description,
            window,
            participants,
            status,
            notes,
            approved_by,
            approved_at,
            created_at,
            updated_at,
            room,
        } = value;
        Self {
            booking_id,
            booked_by,
            title,
            description,
            start_time: window.start,
            end_time: window.end,
            participants,
            status: status.into(),
            notes,
            approved_by,
            approved_at,
            created_at,
            updated_at,
            room: room.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRoomResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub location: String,
    pub is_active: bool,
    pub capacity: i32,
}

impl From<BookingRoom> for BookingRoomResponse {
    fn from(value: BookingRoom) -> Self {
        let BookingRoom {
            room_id,
            room_name,
            location,
            is_active,
            capacity,
        } = value;
        Self {
            room_id,
            room_name,
            location,
            is_active,
            capacity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoriesResponse {
    pub items: Vec<BookingHistoryResponse>,
}

impl From<Vec<BookingHistory>> for BookingHistoriesResponse {
    fn from(value: Vec<BookingHistory>) -> Self {
        Self {
            items: value.into_iter().map(BookingHistoryResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoryResponse {
    pub history_id: i64,
    pub booking_id: BookingId,
    pub old_status: BookingStatusName,
    pub new_status: BookingStatusName,
    pub changed_by: Option<UserId>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookingHistory> for BookingHistoryResponse {
    fn from(value: BookingHistory) -> Self {
        let BookingHistory {
            history_id,
            booking_id,
            old_status,
            new_status,
            changed_by,
            notes,
            created_at,
        } = value;
        Self {
            history_id,
            booking_id,
            old_status: old_status.into(),
            new_status: new_status.into(),
            changed_by,
            notes,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_names_round_trip_through_the_wire_form() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            let name = BookingStatusName::from(status);
            assert_eq!(BookingStatus::from(name), status);
        }
    }

    #[test]
    fn booking_list_query_status_is_optional() {
        let q: BookingListQuery =
            serde_json::from_value(serde_json::json!({ "status": "approved" })).unwrap();
        assert!(matches!(q.status, Some(BookingStatusName::Approved)));

        let q: BookingListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(q.status.is_none());
    }

    #[test]
    fn create_request_rejects_zero_participants() {
        let req = CreateBookingRequest {
            room_id: RoomId::new(),
            title: "Weekly sync".into(),
            description: String::new(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            participants: 0,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_rejects_empty_title() {
        let req = CreateBookingRequest {
            room_id: RoomId::new(),
            title: String::new(),
            description: String::new(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            participants: 3,
        };
        assert!(req.validate().is_err());
    }
}
