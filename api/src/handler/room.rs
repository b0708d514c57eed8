use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::window::TimeWindow, id::RoomId, room::event::CreateRoom,
};
use registry::AppRegistry;
use serde_json::json;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::ActingUser,
    model::room::{
        AvailabilityQuery, AvailabilityResponse, CreateRoomRequest, RoomResponse, RoomsResponse,
    },
};

pub async fn register_room(
    user: ActingUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !user.is_staff() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate()?;

    let CreateRoomRequest {
        room_name,
        description,
        location,
        capacity,
    } = req;
    let room_id = registry
        .room_repository()
        .create(CreateRoom::new(room_name, description, location, capacity))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "roomId": room_id.to_string() })),
    ))
}

pub async fn show_room_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomsResponse>> {
    registry
        .room_repository()
        .find_all()
        .await
        .map(RoomsResponse::from)
        .map(Json)
}

pub async fn show_room(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomResponse>> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .map(RoomResponse::from)
        .map(Json)
        .ok_or_else(|| AppError::EntityNotFound(format!("room {room_id} was not found")))
}

/// Availability probe for the booking form. Non-emptiness of the conflict
/// query is the whole answer; which bookings collide stays private.
pub async fn check_room_availability(
    Path(room_id): Path<RoomId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailabilityResponse>> {
    let room = registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("room {room_id} was not found")))?;

    let window = TimeWindow::new(query.start, query.end);
    if !window.is_ordered() {
        return Ok(Json(AvailabilityResponse {
            available: false,
            message: "the start of the window must come before its end".into(),
        }));
    }

    let conflicts = registry
        .booking_repository()
        .find_overlapping(room.room_id, window, query.booking_id)
        .await?;

    let response = if conflicts.is_empty() {
        AvailabilityResponse {
            available: true,
            message: format!("{} is available for the requested window", room.room_name),
        }
    } else {
        AvailabilityResponse {
            available: false,
            message: format!("{} is already booked for the requested window", room.room_name),
        }
    };
    Ok(Json(response))
}
