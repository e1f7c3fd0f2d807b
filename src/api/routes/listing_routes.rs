use crate::api::controllers::listing_controller;
use axum::Router;
use axum::routing::{get, put};

pub fn routes() -> Router<()> {
    Router::new()
        .route("/public/listings", get(listing_controller::get_public_listings))
        .route(
            "/listings",
            get(listing_controller::get_listings).post(listing_controller::create_listing),
        )
        .route("/user/listings", get(listing_controller::get_user_listings))
        .route("/admin/listings", get(listing_controller::get_admin_listings))
        .route("/admin/all-listings", get(listing_controller::get_all_listings))
        .route(
            "/admin/listings/{id}",
            put(listing_controller::update_listing).delete(listing_controller::delete_listing),
        )
        .route("/admin/listings/{id}/approve", put(listing_controller::approve_listing))
        .route("/admin/listings/{id}/reject", put(listing_controller::reject_listing))
        .route(
            "/admin/listings/{id}/size-variants",
            put(listing_controller::update_size_variants),
        )
        .route("/admin/listings/{id}/update-stock", put(listing_controller::update_stock))
        .route(
            "/departments/{id}/listings",
            get(listing_controller::get_department_listings),
        )
}
