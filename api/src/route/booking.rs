use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    create_booking, show_booking, show_booking_history, show_my_bookings, update_booking,
    update_booking_status,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(create_booking))
        .route("/", get(show_my_bookings))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id", put(update_booking))
        .route("/:booking_id/status", put(update_booking_status))
        .route("/:booking_id/history", get(show_booking_history));

    Router::new().nest("/bookings", booking_routers)
}
