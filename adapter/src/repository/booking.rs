use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::{
    model::{
        booking::{
            event::{BackfillBooking, CreateBooking, UpdateBooking, UpdateBookingStatus},
            transition::{transition, StatusChange},
            validate::{validate, validate_backfill, BookingCandidate, ValidationError},
            window::TimeWindow,
            Booking, BookingHistory, BookingStatus,
        },
        id::{BookingId, RoomId, UserId},
        room::Room,
        user::Actor,
    },
    repository::booking::BookingRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::{
        booking::{BookingHistoryRow, BookingRow},
        room::RoomRow,
    },
    ConnectionPool,
};

/// Booking columns joined with the room slice, matching `BookingRow`.
const SELECT_BOOKING: &str = r#"
    SELECT b.booking_id, b.room_id, b.user_id, b.title, b.description,
           b.start_time, b.end_time, b.participants, b.status, b.notes,
           b.approved_by, b.approved_at, b.created_at, b.updated_at,
           r.room_name, r.location, r.is_active AS room_is_active, r.capacity
    FROM bookings AS b
    INNER JOIN rooms AS r ON b.room_id = r.room_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<BookingId> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Check-then-insert must be one atomic unit per room; the
        // serializable transaction plus the exclusion constraint on the
        // bookings table reject the losing half of a race.
        let room = self.find_room_for_booking(&mut tx, event.room_id).await?;
        let existing = self
            .find_blocking_in_tx(&mut tx, event.room_id, event.window, None)
            .await?;
        let candidate =
            BookingCandidate::new(None, event.room_id, event.window, event.participants);
        validate(&candidate, &room, &existing, now)?;

        let booking_id = BookingId::new();
        self.insert_booking(&mut tx, booking_id, &event, BookingStatus::Pending, now)
            .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(booking_id)
    }

    async fn create_backfill(&self, event: BackfillBooking) -> AppResult<BookingId> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let room = self.find_room_for_booking(&mut tx, event.room_id).await?;
        let existing = self
            .find_blocking_in_tx(&mut tx, event.room_id, event.window, None)
            .await?;
        let candidate =
            BookingCandidate::new(None, event.room_id, event.window, event.participants);
        validate_backfill(&candidate, &room, &existing)?;

        let booking_id = BookingId::new();
        let create = CreateBooking::new(
            event.room_id,
            event.booked_by,
            event.title,
            event.description,
            event.window,
            event.participants,
        );
        self.insert_booking(&mut tx, booking_id, &create, event.status, now)
            .await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(booking_id)
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<()> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let booking = self
            .find_by_id_in_tx(&mut tx, event.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("booking {} was not found", event.booking_id))
            })?;

        if booking.booked_by != event.requested_user {
            return Err(AppError::ForbiddenOperation);
        }
        if !booking.is_editable(now) {
            return Err(AppError::UnprocessableEntity(
                "only pending bookings that have not yet ended can be edited".into(),
            ));
        }

        let room = self
            .find_room_for_booking(&mut tx, booking.room.room_id)
            .await?;
        let existing = self
            .find_blocking_in_tx(
                &mut tx,
                booking.room.room_id,
                event.window,
                Some(event.booking_id),
            )
            .await?;
        let candidate = BookingCandidate::new(
            Some(event.booking_id),
            booking.room.room_id,
            event.window,
            event.participants,
        );
        validate(&candidate, &room, &existing, now)?;

        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET title = $1, description = $2, start_time = $3, end_time = $4,
                participants = $5, updated_at = $6
            WHERE booking_id = $7
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.window.start)
        .bind(event.window.end)
        .bind(event.participants)
        .bind(now)
        .bind(event.booking_id)
        .execute(&mut *tx)
        .await
        .map_err(map_booking_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn update_status(&self, event: UpdateBookingStatus) -> AppResult<()> {
        let now = Utc::now();
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let mut booking = self
            .find_by_id_in_tx(&mut tx, event.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("booking {} was not found", event.booking_id))
            })?;

        let change = transition(
            &mut booking,
            event.new_status,
            &event.actor,
            &event.notes,
            now,
        )?;
        self.apply_status_change(&mut tx, &booking, &change).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(())
    }

    async fn complete_overdue(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tx = self.db.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE b.status = 'approved' AND b.end_time <= $1"
        ))
        .bind(now)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let mut swept = 0;
        for row in rows {
            let mut booking = Booking::try_from(row)?;
            let change = transition(
                &mut booking,
                BookingStatus::Completed,
                &Actor::System,
                "completed by sweep",
                now,
            )?;
            self.apply_status_change(&mut tx, &booking, &change).await?;
            swept += 1;
        }

        tx.commit().await.map_err(AppError::TransactionError)?;
        Ok(swept)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE b.booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: UserId,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            r#"{SELECT_BOOKING}
            WHERE b.user_id = $1
              AND ($2::varchar IS NULL OR b.status = $2)
            ORDER BY b.created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_overlapping(
        &self,
        room_id: RoomId,
        window: TimeWindow,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            r#"{SELECT_BOOKING}
            WHERE b.room_id = $1
              AND b.status IN ('pending', 'approved')
              AND b.start_time < $3
              AND $2 < b.end_time
              AND ($4::uuid IS NULL OR b.booking_id <> $4)
            "#
        ))
        .bind(room_id)
        .bind(window.start)
        .bind(window.end)
        .bind(exclude)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_history_by_booking_id(
        &self,
        booking_id: BookingId,
    ) -> AppResult<Vec<BookingHistory>> {
        let rows = sqlx::query_as::<_, BookingHistoryRow>(
            r#"
            SELECT history_id, booking_id, old_status, new_status,
                   changed_by, notes, created_at
            FROM booking_history
            WHERE booking_id = $1
            ORDER BY created_at ASC, history_id ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::DbQueryError)?;

        rows.into_iter().map(BookingHistory::try_from).collect()
    }
}

impl BookingRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    /// The room a booking is being placed in. Missing rooms are a 404,
    /// inactive rooms are not bookable.
    async fn find_room_for_booking(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
    ) -> AppResult<Room> {
        let row = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT room_id, room_name, description, location,
                   capacity, is_active, created_at, updated_at
            FROM rooms
            WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let room = row.map(Room::from).ok_or_else(|| {
            AppError::EntityNotFound(format!("room {room_id} was not found"))
        })?;
        if !room.is_active {
            return Err(AppError::UnprocessableEntity(format!(
                "room {} is not available for booking",
                room.room_name
            )));
        }
        Ok(room)
    }

    /// The conflict query pushed down into SQL: blocking bookings for the
    /// room overlapping the window, minus the excluded id when editing.
    async fn find_blocking_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
        window: TimeWindow,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            r#"{SELECT_BOOKING}
            WHERE b.room_id = $1
              AND b.status IN ('pending', 'approved')
              AND b.start_time < $3
              AND $2 < b.end_time
              AND ($4::uuid IS NULL OR b.booking_id <> $4)
            "#
        ))
        .bind(room_id)
        .bind(window.start)
        .bind(window.end)
        .bind(exclude)
        .fetch_all(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_by_id_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking_id: BookingId,
    ) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE b.booking_id = $1 FOR UPDATE OF b"
        ))
        .bind(booking_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Booking::try_from).transpose()
    }

    async fn insert_booking(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking_id: BookingId,
        event: &CreateBooking,
        status: BookingStatus,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            INSERT INTO bookings
            (booking_id, room_id, user_id, title, description,
             start_time, end_time, participants, status, notes,
             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, '', $10, $10)
            "#,
        )
        .bind(booking_id)
        .bind(event.room_id)
        .bind(event.booked_by)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.window.start)
        .bind(event.window.end)
        .bind(event.participants)
        .bind(status.as_str())
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(map_booking_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been created".into(),
            ));
        }
        Ok(())
    }

    /// Writes the updated booking columns and appends exactly one history
    /// row for the change.
    async fn apply_status_change(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking: &Booking,
        change: &StatusChange,
    ) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $1, approved_by = $2, approved_at = $3, updated_at = $4
            WHERE booking_id = $5
            "#,
        )
        .bind(booking.status.as_str())
        .bind(booking.approved_by)
        .bind(booking.approved_at)
        .bind(booking.updated_at)
        .bind(booking.booking_id)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been updated".into(),
            ));
        }

        let res = sqlx::query(
            r#"
            INSERT INTO booking_history
            (booking_id, old_status, new_status, changed_by, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(change.booking_id)
        .bind(change.old_status.as_str())
        .bind(change.new_status.as_str())
        .bind(change.changed_by)
        .bind(&change.notes)
        .bind(change.changed_at)
        .execute(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking history record has been created".into(),
            ));
        }
        Ok(())
    }
}

/// A concurrent writer that slipped past validation still trips the
/// `bookings_no_overlap` exclusion constraint; report that as the same
/// schedule conflict the validator would have raised.
fn map_booking_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.constraint() == Some("bookings_no_overlap") => {
            ValidationError::ScheduleConflict.into()
        }
        _ => AppError::SpecificOperationError(e),
    }
}
