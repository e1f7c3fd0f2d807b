use crate::api::controllers::dashboard_controller;
use axum::Router;
use axum::routing::get;

pub fn routes() -> Router<()> {
    Router::new()
        .route("/ping", get(dashboard_controller::ping))
        .route("/admin/dashboard-stats", get(dashboard_controller::dashboard_stats))
}
