use crate::api::controllers::auth_controller::{current_user, login, logout, permissions, register};
use axum::Router;
use axum::routing::{get, post};

pub fn routes() -> Router<()> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
        .route("/user/permissions", get(permissions))
}
