use axum::Router;

pub mod auth_routes;
pub mod dashboard_routes;
pub mod department_routes;
pub mod discount_code_routes;
pub mod listing_routes;
pub mod notification_routes;
pub mod order_routes;
pub mod reservation_routes;
pub mod user_routes;

/// Every JSON endpoint, relative to `/api`.
pub fn api_routes() -> Router<()> {
    Router::new()
        .merge(auth_routes::routes())
        .merge(user_routes::routes())
        .merge(department_routes::routes())
        .merge(listing_routes::routes())
        .merge(order_routes::routes())
        .merge(discount_code_routes::routes())
        .merge(notification_routes::routes())
        .merge(reservation_routes::routes())
        .merge(dashboard_routes::routes())
}
