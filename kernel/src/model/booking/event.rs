use derive_new::new;

use crate::model::{
    booking::{window::TimeWindow, BookingStatus},
    id::{BookingId, RoomId, UserId},
    user::Actor,
};

#[derive(new)]
pub struct CreateBooking {
    pub room_id: RoomId,
    pub booked_by: UserId,
    pub title: String,
    pub description: String,
    pub window: TimeWindow,
    pub participants: i32,
}

/// Edit of an existing booking by its owner. The booking keeps its room;
/// only the schedulable fields move.
#[derive(new)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub title: String,
    pub description: String,
    pub window: TimeWindow,
    pub participants: i32,
}

/// Historical booking loaded by a migration or fixture. Carries its final
/// status directly; the past-date rule does not apply to it.
#[derive(new)]
pub struct BackfillBooking {
    pub room_id: RoomId,
    pub booked_by: UserId,
    pub title: String,
    pub description: String,
    pub window: TimeWindow,
    pub participants: i32,
    pub status: BookingStatus,
}

#[derive(new)]
pub struct UpdateBookingStatus {
    pub booking_id: BookingId,
    pub new_status: BookingStatus,
    pub actor: Actor,
    pub notes: String,
}
