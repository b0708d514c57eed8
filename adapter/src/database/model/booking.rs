use kernel::model::{
    booking::{window::TimeWindow, Booking, BookingHistory, BookingRoom},
    id::{BookingId, RoomId, UserId},
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};

/// A booking joined with the slice of room columns the domain model
/// carries. `status` stays a string until conversion so a bad row surfaces
/// as a `ConversionEntityError` instead of a decode panic.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub participants: i32,
    pub status: String,
    pub notes: String,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room_name: String,
    pub location: String,
    pub room_is_active: bool,
    pub capacity: i32,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            room_id,
            user_id,
            title,
            description,
            start_time,
            end_time,
            participants,
            status,
            notes,
            approved_by,
            approved_at,
            created_at,
            updated_at,
            room_name,
            location,
            room_is_active,
            capacity,
        } = value;
        Ok(Booking {
            booking_id,
            booked_by: user_id,
            title,
            description,
            window: TimeWindow::new(start_time, end_time),
            participants,
            status: status.parse()?,
            notes,
            approved_by,
            approved_at,
            created_at,
            updated_at,
            room: BookingRoom {
                room_id,
                room_name,
                location,
                is_active: room_is_active,
                capacity,
            },
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct BookingHistoryRow {
    pub history_id: i64,
    pub booking_id: BookingId,
    pub old_status: String,
    pub new_status: String,
    pub changed_by: Option<UserId>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookingHistoryRow> for BookingHistory {
    type Error = AppError;

    fn try_from(value: BookingHistoryRow) -> Result<Self, Self::Error> {
        let BookingHistoryRow {
            history_id,
            booking_id,
            old_status,
            new_status,
            changed_by,
            notes,
            created_at,
        } = value;
        Ok(BookingHistory {
            history_id,
            booking_id,
            old_status: old_status.parse()?,
            new_status: new_status.parse()?,
            changed_by,
            notes,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use kernel::model::booking::BookingStatus;

    use super::*;

    fn row(status: &str) -> BookingRow {
        let t = Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap();
        BookingRow {
            booking_id: BookingId::new(),
            room_id: RoomId::new(),
            user_id: UserId::new(),
            title: "Weekly sync".into(),
            description: String::new(),
            start_time: t,
            end_time: Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap(),
            participants: 5,
            status: status.into(),
            notes: String::new(),
            approved_by: None,
            approved_at: None,
            created_at: t,
            updated_at: t,
            room_name: "Conference Room A".into(),
            location: "Building 1".into(),
            room_is_active: true,
            capacity: 10,
        }
    }

    #[test]
    fn status_column_is_parsed() {
        let booking = Booking::try_from(row("approved")).unwrap();
        assert_eq!(booking.status, BookingStatus::Approved);
        assert!(booking.window.is_ordered());
    }

    #[test]
    fn unknown_status_fails_conversion() {
        assert!(Booking::try_from(row("tentative")).is_err());
    }
}
