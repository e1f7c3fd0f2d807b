use crate::api::controllers::dto::user_dto::{CreateUserRequest, UpdateUserRequest};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::response::{MessageResponse, with_message};
use crate::data::models::user::User;
use crate::services::user_service::UserService;
use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub async fn get_all_users(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let service = UserService::new();

    let users = service.list_users(&actor).await?;
    let users = service.sessions_for(&users).await?;

    Ok(Json(json!({ "users": users })))
}

pub async fn department_users(
    AuthUser(actor): AuthUser,
    Path(department_id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    let service = UserService::new();

    let users = service.department_users(&actor, department_id).await?;
    let users = service.sessions_for(&users).await?;

    Ok(Json(json!({ "users": users })))
}

pub async fn create_user(
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, APIErrors> {
    let service = UserService::new();

    let user = service.create_user(&actor, payload).await?;
    let user = service.session_for(&user).await?;

    Ok(with_message(StatusCode::CREATED, "User created successfully", "user", user))
}

pub async fn update_user(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Response, APIErrors> {
    let service = UserService::new();

    let user = service.update_user(&actor, id, payload).await?;
    let user = service.session_for(&user).await?;

    Ok(with_message(StatusCode::OK, "User updated successfully", "user", user))
}

pub async fn delete_user(
    AuthUser(actor): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    UserService::new().delete_user(&actor, id).await?;

    Ok(MessageResponse::new("User deleted successfully"))
}

async fn role_changed(user: User, message: &str) -> Result<Response, APIErrors> {
    let user = UserService::new().session_for(&user).await?;

    Ok(with_message(StatusCode::OK, message, "user", user))
}

pub async fn grant_admin(AuthUser(actor): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let user = UserService::new().grant_admin(&actor, id).await?;
    role_changed(user, "Admin privileges granted successfully").await
}

pub async fn revoke_admin(AuthUser(actor): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let user = UserService::new().revoke_admin(&actor, id).await?;
    role_changed(user, "Admin privileges revoked successfully").await
}

pub async fn grant_superadmin(AuthUser(actor): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let user = UserService::new().grant_superadmin(&actor, id).await?;
    role_changed(user, "Super Admin privileges granted successfully").await
}

pub async fn revoke_superadmin(AuthUser(actor): AuthUser, Path(id): Path<i32>) -> Result<Response, APIErrors> {
    let user = UserService::new().revoke_superadmin(&actor, id).await?;
    role_changed(user, "Super Admin privileges revoked successfully").await
}
