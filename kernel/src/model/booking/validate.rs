use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::{
    booking::{window::TimeWindow, Booking},
    id::{BookingId, RoomId},
    room::Room,
};

/// Why a booking request was refused. Every variant is user-facing and
/// recoverable; callers render these into their own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("the start of a booking must come before its end")]
    InvalidWindow,
    #[error("bookings cannot be placed in the past")]
    PastBooking,
    #[error("{requested} participants exceed the room capacity of {capacity}")]
    CapacityExceeded { requested: i32, capacity: i32 },
    #[error("the room already has a booking for an overlapping time window")]
    ScheduleConflict,
}

impl From<ValidationError> for shared::error::AppError {
    fn from(value: ValidationError) -> Self {
        shared::error::AppError::UnprocessableEntity(value.to_string())
    }
}

/// A booking request as seen by the validator. `booking_id` is set when an
/// existing booking is being edited, so the conflict check can skip the
/// booking's own row.
#[derive(Debug, new)]
pub struct BookingCandidate {
    pub booking_id: Option<BookingId>,
    pub room_id: RoomId,
    pub window: TimeWindow,
    pub participants: i32,
}

/// Checks a candidate against the room and the room's blocking bookings,
/// in order, stopping at the first failure:
/// window ordering, not-in-the-past, capacity, schedule conflict.
///
/// Pure; persisting an admissible candidate is the caller's job.
pub fn validate(
    candidate: &BookingCandidate,
    room: &Room,
    existing: &[Booking],
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    validate_inner(candidate, room, existing, Some(now))
}

/// Same rule set minus the past-date check. Only for loading historical
/// bookings (migrations, fixtures); request handling always goes through
/// [`validate`].
pub fn validate_backfill(
    candidate: &BookingCandidate,
    room: &Room,
    existing: &[Booking],
) -> Result<(), ValidationError> {
    validate_inner(candidate, room, existing, None)
}

fn validate_inner(
    candidate: &BookingCandidate,
    room: &Room,
    existing: &[Booking],
    past_cutoff: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if !candidate.window.is_ordered() {
        return Err(ValidationError::InvalidWindow);
    }

    if let Some(now) = past_cutoff {
        if candidate.window.start < now {
            return Err(ValidationError::PastBooking);
        }
    }

    if candidate.participants > room.capacity {
        return Err(ValidationError::CapacityExceeded {
            requested: candidate.participants,
            capacity: room.capacity,
        });
    }

    if !conflicting_bookings(existing, &candidate.window, candidate.booking_id).is_empty() {
        return Err(ValidationError::ScheduleConflict);
    }

    Ok(())
}

/// Pending/approved bookings whose windows overlap `window`, minus the
/// excluded booking when one is given. Result order is unspecified.
pub fn conflicting_bookings<'a>(
    existing: &'a [Booking],
    window: &TimeWindow,
    exclude: Option<BookingId>,
) -> Vec<&'a Booking> {
    existing
        .iter()
        .filter(|b| b.status.blocks_room())
        .filter(|b| exclude != Some(b.booking_id))
        .filter(|b| b.window.overlaps(window))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::{
        booking::{BookingRoom, BookingStatus},
        id::UserId,
    };

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, day, hour, min, 0).unwrap()
    }

    fn room(capacity: i32) -> Room {
        Room {
            room_id: RoomId::new(),
            room_name: "Conference Room A".into(),
            description: String::new(),
            location: "Building 1, Floor 2".into(),
            capacity,
            is_active: true,
            created_at: at(1, 0, 0),
            updated_at: at(1, 0, 0),
        }
    }

    fn booking(room: &Room, status: BookingStatus, window: TimeWindow) -> Booking {
        Booking {
            booking_id: BookingId::new(),
            booked_by: UserId::new(),
            title: "Team meeting".into(),
            description: String::new(),
            window,
            participants: 2,
            status,
            notes: String::new(),
            approved_by: None,
            approved_at: None,
            created_at: at(1, 0, 0),
            updated_at: at(1, 0, 0),
            room: BookingRoom {
                room_id: room.room_id,
                room_name: room.room_name.clone(),
                location: room.location.clone(),
                is_active: room.is_active,
                capacity: room.capacity,
            },
        }
    }

    fn candidate(room: &Room, window: TimeWindow) -> BookingCandidate {
        BookingCandidate::new(None, room.room_id, window, 4)
    }

    #[test]
    fn inverted_window_is_rejected() {
        let room = room(10);
        let c = candidate(&room, TimeWindow::new(at(2, 12, 0), at(2, 10, 0)));
        assert_eq!(
            validate(&c, &room, &[], at(1, 0, 0)),
            Err(ValidationError::InvalidWindow)
        );
    }

    #[test]
    fn empty_window_is_rejected() {
        let room = room(10);
        let c = candidate(&room, TimeWindow::new(at(2, 10, 0), at(2, 10, 0)));
        assert_eq!(
            validate(&c, &room, &[], at(1, 0, 0)),
            Err(ValidationError::InvalidWindow)
        );
    }

    #[test]
    fn past_start_is_rejected() {
        let room = room(10);
        let c = candidate(&room, TimeWindow::new(at(2, 10, 0), at(2, 12, 0)));
        assert_eq!(
            validate(&c, &room, &[], at(3, 0, 0)),
            Err(ValidationError::PastBooking)
        );
    }

    #[test]
    fn start_exactly_now_is_allowed() {
        let room = room(10);
        let c = candidate(&room, TimeWindow::new(at(2, 10, 0), at(2, 12, 0)));
        assert_eq!(validate(&c, &room, &[], at(2, 10, 0)), Ok(()));
    }

    #[test]
    fn capacity_overflow_carries_both_values() {
        let room = room(3);
        let c = BookingCandidate::new(
            None,
            room.room_id,
            TimeWindow::new(at(2, 10, 0), at(2, 12, 0)),
            5,
        );
        assert_eq!(
            validate(&c, &room, &[], at(1, 0, 0)),
            Err(ValidationError::CapacityExceeded {
                requested: 5,
                capacity: 3
            })
        );
    }

    #[test]
    fn overlap_with_approved_booking_is_a_conflict() {
        let room = room(10);
        let existing = vec![booking(
            &room,
            BookingStatus::Approved,
            TimeWindow::new(at(2, 10, 0), at(2, 12, 0)),
        )];
        let c = candidate(&room, TimeWindow::new(at(2, 11, 0), at(2, 11, 30)));
        assert_eq!(
            validate(&c, &room, &existing, at(1, 0, 0)),
            Err(ValidationError::ScheduleConflict)
        );
    }

    #[test]
    fn adjacent_booking_is_admissible() {
        let room = room(10);
        let existing = vec![booking(
            &room,
            BookingStatus::Approved,
            TimeWindow::new(at(2, 10, 0), at(2, 12, 0)),
        )];
        let c = candidate(&room, TimeWindow::new(at(2, 12, 0), at(2, 13, 0)));
        assert_eq!(validate(&c, &room, &existing, at(1, 0, 0)), Ok(()));
    }

    #[test]
    fn cancelled_and_rejected_bookings_do_not_conflict() {
        let room = room(10);
        let window = TimeWindow::new(at(2, 10, 0), at(2, 12, 0));
        let existing = vec![
            booking(&room, BookingStatus::Cancelled, window),
            booking(&room, BookingStatus::Rejected, window),
            booking(&room, BookingStatus::Completed, window),
        ];
        let c = candidate(&room, window);
        assert_eq!(validate(&c, &room, &existing, at(1, 0, 0)), Ok(()));
    }

    #[test]
    fn editing_a_booking_never_conflicts_with_itself() {
        let room = room(10);
        let existing_booking = booking(
            &room,
            BookingStatus::Pending,
            TimeWindow::new(at(2, 10, 0), at(2, 12, 0)),
        );
        let c = BookingCandidate::new(
            Some(existing_booking.booking_id),
            room.room_id,
            existing_booking.window,
            4,
        );
        assert_eq!(
            validate(&c, &room, &[existing_booking], at(1, 0, 0)),
            Ok(())
        );
    }

    #[test]
    fn checks_short_circuit_in_order() {
        // Window is inverted, in the past, over capacity and conflicting;
        // the ordering failure must win.
        let room = room(1);
        let existing = vec![booking(
            &room,
            BookingStatus::Approved,
            TimeWindow::new(at(2, 9, 0), at(2, 13, 0)),
        )];
        let c = BookingCandidate::new(
            None,
            room.room_id,
            TimeWindow::new(at(2, 12, 0), at(2, 10, 0)),
            5,
        );
        assert_eq!(
            validate(&c, &room, &existing, at(3, 0, 0)),
            Err(ValidationError::InvalidWindow)
        );
    }

    #[test]
    fn backfill_skips_the_past_check_only() {
        let room = room(3);
        let past_window = TimeWindow::new(at(2, 10, 0), at(2, 12, 0));
        let c = candidate(&room, past_window);
        // Past window: strict validation refuses, backfill accepts.
        assert_eq!(
            validate(&c, &room, &[], at(5, 0, 0)),
            Err(ValidationError::PastBooking)
        );
        assert_eq!(validate_backfill(&c, &room, &[]), Ok(()));

        // Every other rule still applies to backfilled rows.
        let over = BookingCandidate::new(None, room.room_id, past_window, 9);
        assert_eq!(
            validate_backfill(&over, &room, &[]),
            Err(ValidationError::CapacityExceeded {
                requested: 9,
                capacity: 3
            })
        );
        let conflicting = vec![booking(&room, BookingStatus::Approved, past_window)];
        assert_eq!(
            validate_backfill(&c, &room, &conflicting),
            Err(ValidationError::ScheduleConflict)
        );
    }

    #[test]
    fn conflict_query_filters_by_status_window_and_exclusion() {
        let room = room(10);
        let target = TimeWindow::new(at(2, 10, 0), at(2, 12, 0));
        let overlapping = booking(&room, BookingStatus::Pending, target);
        let disjoint = booking(
            &room,
            BookingStatus::Approved,
            TimeWindow::new(at(2, 13, 0), at(2, 14, 0)),
        );
        let cancelled = booking(&room, BookingStatus::Cancelled, target);
        let existing = vec![overlapping.clone(), disjoint, cancelled];

        let hits = conflicting_bookings(&existing, &target, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].booking_id, overlapping.booking_id);

        let excluded = conflicting_bookings(&existing, &target, Some(overlapping.booking_id));
        assert!(excluded.is_empty());
    }
}
