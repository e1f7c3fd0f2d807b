use crate::api::controllers::reservation_controller;
use axum::Router;
use axum::routing::get;

pub fn routes() -> Router<()> {
    Router::new().route(
        "/reservations",
        get(reservation_controller::get_reservations)
            .post(reservation_controller::create_reservation),
    )
}
