use crate::api::controllers::order_controller;
use axum::Router;
use axum::routing::{get, post, put};

pub fn routes() -> Router<()> {
    Router::new()
        .route(
            "/orders",
            get(order_controller::get_orders).post(order_controller::create_order),
        )
        .route("/orders/{id}", get(order_controller::get_order))
        .route("/orders/{id}/cancel", post(order_controller::cancel_order))
        .route("/orders/{id}/upload-receipt", post(order_controller::upload_receipt))
        .route("/orders/{id}/apply-discount", post(order_controller::apply_discount))
        .route("/orders/{id}/rate", post(order_controller::rate_order))
        .route("/admin/orders", get(order_controller::get_admin_orders))
        .route("/admin/orders/{id}/status", put(order_controller::update_order_status))
        .route(
            "/admin/orders/{id}/confirm-reservation-fee",
            post(order_controller::confirm_reservation_fee),
        )
        .route("/admin/sales-report", get(order_controller::sales_report))
}
