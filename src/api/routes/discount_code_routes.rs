use crate::api::controllers::discount_code_controller;
use axum::Router;
use axum::routing::{get, post};

pub fn routes() -> Router<()> {
    Router::new()
        .route(
            "/admin/discount-codes",
            get(discount_code_controller::get_discount_codes)
                .post(discount_code_controller::create_discount_code),
        )
        .route(
            "/admin/discount-codes/all",
            get(discount_code_controller::get_all_discount_codes),
        )
        .route(
            "/admin/discount-codes/stats",
            get(discount_code_controller::discount_code_stats),
        )
        .route(
            "/admin/discount-codes/generate",
            post(discount_code_controller::generate_discount_code),
        )
        .route(
            "/admin/discount-codes/{id}",
            get(discount_code_controller::get_discount_code)
                .put(discount_code_controller::update_discount_code)
                .delete(discount_code_controller::delete_discount_code),
        )
        .route(
            "/discount-codes/validate",
            post(discount_code_controller::validate_discount_code),
        )
        .route(
            "/discount-codes/calculate",
            post(discount_code_controller::calculate_discount),
        )
}
