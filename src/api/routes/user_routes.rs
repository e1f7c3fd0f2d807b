use crate::api::controllers::user_controller;
use axum::Router;
use axum::routing::{get, put};

pub fn routes() -> Router<()> {
    Router::new()
        .route(
            "/admin/users",
            get(user_controller::get_all_users).post(user_controller::create_user),
        )
        .route(
            "/admin/users/{id}",
            put(user_controller::update_user).delete(user_controller::delete_user),
        )
        .route("/admin/users/{id}/grant-admin", put(user_controller::grant_admin))
        .route("/admin/users/{id}/revoke-admin", put(user_controller::revoke_admin))
        .route("/admin/users/{id}/grant-superadmin", put(user_controller::grant_superadmin))
        .route("/admin/users/{id}/revoke-superadmin", put(user_controller::revoke_superadmin))
        .route("/departments/{id}/users", get(user_controller::department_users))
}
