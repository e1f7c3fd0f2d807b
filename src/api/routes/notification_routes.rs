use crate::api::controllers::notification_controller;
use axum::Router;
use axum::routing::{delete, get, post};

pub fn routes() -> Router<()> {
    Router::new()
        .route(
            "/notifications",
            get(notification_controller::get_notifications)
                .delete(notification_controller::clear_notifications),
        )
        .route("/notifications/unread-count", get(notification_controller::unread_count))
        .route("/notifications/mark-read", post(notification_controller::mark_read))
        .route(
            "/notifications/{id}/mark-read",
            post(notification_controller::mark_one_read),
        )
        .route("/notifications/{id}", delete(notification_controller::delete_notification))
}
