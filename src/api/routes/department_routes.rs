use crate::api::controllers::{category_controller, department_controller};
use axum::Router;
use axum::routing::{get, put};

pub fn routes() -> Router<()> {
    Router::new()
        .route("/departments", get(department_controller::get_departments))
        .route("/categories", get(category_controller::get_categories))
        .route(
            "/admin/departments",
            get(department_controller::get_admin_departments)
                .post(department_controller::create_department),
        )
        .route(
            "/admin/departments/{id}",
            put(department_controller::update_department)
                .delete(department_controller::delete_department),
        )
}
