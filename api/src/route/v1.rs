use axum::Router;
use registry::AppRegistry;

use super::{booking::build_booking_routers, room::build_room_routers};

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_room_routers())
        .merge(build_booking_routers());
    Router::new().nest("/api/v1", router)
}
