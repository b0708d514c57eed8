use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{BackfillBooking, CreateBooking, UpdateBooking, UpdateBookingStatus},
        window::TimeWindow,
        Booking, BookingHistory, BookingStatus,
    },
    id::{BookingId, RoomId, UserId},
};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Validates the request and persists it as one atomic unit. A racing
    /// overlapping request for the same room must not also commit.
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId>;

    /// Like [`create`](Self::create) but through the backfill rule set,
    /// which admits past-dated windows. Reserved for migrations and
    /// fixture loading.
    async fn create_backfill(&self, event: BackfillBooking) -> AppResult<BookingId>;

    /// Owner edit of a pending booking whose window has not yet ended;
    /// re-validates with the booking's own row excluded from the conflict
    /// check.
    async fn update(&self, event: UpdateBooking) -> AppResult<()>;

    /// Applies the transition table and appends the history row.
    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<()>;

    /// Marks every approved booking whose end has passed as completed.
    /// Returns the number of bookings swept.
    async fn complete_overdue(&self, now: DateTime<Utc>) -> AppResult<u64>;

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;

    /// A user's bookings, newest first, optionally narrowed to one status.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>>;

    /// Blocking (pending/approved) bookings for a room overlapping the
    /// window, minus the excluded booking when one is given. Non-emptiness
    /// means the room is taken.
    async fn find_overlapping(
        &self,
        room_id: RoomId,
        window: TimeWindow,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>>;

    async fn find_history_by_booking_id(
        &self,
        booking_id: BookingId,
    ) -> AppResult<Vec<BookingHistory>>;
}
