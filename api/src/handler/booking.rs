use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::{event::UpdateBookingStatus, Booking, BookingStatus},
    id::BookingId,
};
use registry::AppRegistry;
use serde_json::json;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::ActingUser,
    model::booking::{
        BookingHistoriesResponse, BookingListQuery, BookingResponse, BookingsResponse,
        CreateBookingRequest, CreateBookingRequestWithUser, UpdateBookingRequest,
        UpdateBookingRequestWithIds, UpdateBookingStatusRequest,
    },
};

pub async fn create_booking(
    user: ActingUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let booking_id = registry
        .booking_repository()
        .create(CreateBookingRequestWithUser::new(user.id(), req).into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "bookingId": booking_id.to_string() })),
    ))
}

pub async fn show_my_bookings(
    user: ActingUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_user_id(user.id(), query.status.map(BookingStatus::from))
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: ActingUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    find_visible_booking(&user, booking_id, &registry)
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn update_booking(
    user: ActingUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    registry
        .booking_repository()
        .update(UpdateBookingRequestWithIds::new(booking_id, user.id(), req).into())
        .await?;

    Ok(StatusCode::OK)
}

/// Single endpoint for approve/reject/cancel. Who may do what is decided
/// by the transition table, not here.
pub async fn update_booking_status(
    user: ActingUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> AppResult<StatusCode> {
    req.validate()?;

    let UpdateBookingStatusRequest { status, notes } = req;
    registry
        .booking_repository()
        .update_status(UpdateBookingStatus::new(
            booking_id,
            status.into(),
            user.actor(),
            notes,
        ))
        .await?;

    Ok(StatusCode::OK)
}

pub async fn show_booking_history(
    user: ActingUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingHistoriesResponse>> {
    // Visibility follows the booking itself.
    find_visible_booking(&user, booking_id, &registry).await?;

    registry
        .booking_repository()
        .find_history_by_booking_id(booking_id)
        .await
        .map(BookingHistoriesResponse::from)
        .map(Json)
}

/// Owners see their own bookings; staff see everything.
async fn find_visible_booking(
    user: &ActingUser,
    booking_id: BookingId,
    registry: &AppRegistry,
) -> AppResult<Booking> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("booking {booking_id} was not found"))
        })?;

    if booking.booked_by != user.id() && !user.is_staff() {
        return Err(AppError::ForbiddenOperation);
    }
    Ok(booking)
}
