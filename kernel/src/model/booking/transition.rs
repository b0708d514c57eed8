use chrono::{DateTime, Utc};

use crate::model::{
    booking::{Booking, BookingStatus},
    id::{BookingId, UserId},
    user::Actor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("a booking cannot move from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

impl From<TransitionError> for shared::error::AppError {
    fn from(value: TransitionError) -> Self {
        shared::error::AppError::UnprocessableEntity(value.to_string())
    }
}

/// The single history row a successful transition produces. Callers append
/// it to the booking's history; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub booking_id: BookingId,
    pub old_status: BookingStatus,
    pub new_status: BookingStatus,
    pub changed_by: Option<UserId>,
    pub notes: String,
    pub changed_at: DateTime<Utc>,
}

/// Applies the status-transition table:
///
/// - pending -> approved / rejected: staff only
/// - pending / approved -> cancelled: owner or staff, end instant in future
/// - approved -> completed: the system sweep, end instant in the past
///
/// Same-status no-ops and everything else fail with `InvalidTransition`.
/// On success the booking is updated in place (`approved_by`/`approved_at`
/// only when entering approved) and the history row is returned.
pub fn transition(
    booking: &mut Booking,
    new_status: BookingStatus,
    actor: &Actor,
    notes: &str,
    now: DateTime<Utc>,
) -> Result<StatusChange, TransitionError> {
    use BookingStatus::*;

    let from = booking.status;
    let allowed = match (from, new_status) {
        (Pending, Approved) | (Pending, Rejected) => actor.is_staff(),
        (Pending, Cancelled) | (Approved, Cancelled) => {
            let by_owner = actor.user_id() == Some(booking.booked_by);
            (by_owner || actor.is_staff()) && !booking.window.has_ended(now)
        }
        (Approved, Completed) => {
            matches!(actor, Actor::System) && booking.window.has_ended(now)
        }
        _ => false,
    };

    if !allowed {
        return Err(TransitionError::InvalidTransition {
            from,
            to: new_status,
        });
    }

    booking.status = new_status;
    booking.updated_at = now;
    if new_status == Approved {
        booking.approved_by = actor.user_id();
        booking.approved_at = Some(now);
    }

    Ok(StatusChange {
        booking_id: booking.booking_id,
        old_status: from,
        new_status,
        changed_by: actor.user_id(),
        notes: notes.to_string(),
        changed_at: now,
    })
}
