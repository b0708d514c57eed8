use std::str::FromStr;

use chrono::{DateTime, Utc};
use shared::error::AppError;

use crate::model::id::{BookingId, RoomId, UserId};

pub mod event;
pub mod transition;
pub mod validate;
pub mod window;

use window::TimeWindow;

#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub title: String,
    pub description: String,
    pub window: TimeWindow,
    pub participants: i32,
    pub status: BookingStatus,
    pub notes: String,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub room: BookingRoom,
}

impl Booking {
    /// Owners may rework a booking only while it is still pending and its
    /// window has not yet ended. An elapsed pending booking stays dead;
    /// moving it to a future window is not an edit but a new request.
    pub fn is_editable(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Pending && !self.window.has_ended(now)
    }
}

/// The slice of room data a booking carries around.
#[derive(Debug, Clone)]
pub struct BookingRoom {
    pub room_id: RoomId,
    pub room_name: String,
    pub location: String,
    pub is_active: bool,
    pub capacity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Pending and approved bookings hold the room; the other statuses
    /// never count against availability.
    pub fn blocks_room(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(AppError::ConversionEntityError(format!(
                "unknown booking status: {other}"
            ))),
        }
    }
}

/// One entry of a booking's append-only status history.
#[derive(Debug, Clone)]
pub struct BookingHistory {
    pub history_id: i64,
    pub booking_id: BookingId,
    pub old_status: BookingStatus,
    pub new_status: BookingStatus,
    pub changed_by: Option<UserId>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, day, hour, 0, 0).unwrap()
    }

    fn booking(status: BookingStatus, window: TimeWindow) -> Booking {
        Booking {
            booking_id: BookingId::new(),
            booked_by: UserId::new(),
            title: "Team meeting".into(),
            description: String::new(),
            window,
            participants: 4,
            status,
            notes: String::new(),
            approved_by: None,
            approved_at: None,
            created_at: at(1, 0),
            updated_at: at(1, 0),
            room: BookingRoom {
                room_id: RoomId::new(),
                room_name: "Conference Room A".into(),
                location: "Building 1, Floor 2".into(),
                is_active: true,
                capacity: 10,
            },
        }
    }

    #[test]
    fn pending_booking_with_a_live_window_is_editable() {
        let b = booking(
            BookingStatus::Pending,
            TimeWindow::new(at(2, 10), at(2, 12)),
        );
        assert!(b.is_editable(at(1, 0)));
        // Still editable while the window is running.
        assert!(b.is_editable(at(2, 11)));
    }

    #[test]
    fn elapsed_pending_booking_is_not_editable() {
        let b = booking(
            BookingStatus::Pending,
            TimeWindow::new(at(2, 10), at(2, 12)),
        );
        assert!(!b.is_editable(at(2, 12)));
        assert!(!b.is_editable(at(3, 0)));
    }

    #[test]
    fn only_pending_bookings_are_editable() {
        let future = TimeWindow::new(at(2, 10), at(2, 12));
        for status in [
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert!(!booking(status, future).is_editable(at(1, 0)));
        }
    }
}
