use crate::api::controllers::dto::user_dto::{LoginRequest, RegisterRequest};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::response::{AuthResponse, MessageResponse};
use crate::services::user_service::{UserService, session};
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

pub async fn register(Json(payload): Json<RegisterRequest>) -> Result<impl IntoResponse, APIErrors> {
    let service = UserService::new();

    let (user, token) = service.register(payload).await?;
    let user = service.session_for(&user).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: Some("Registration successful".to_string()),
            user,
            token,
        }),
    ))
}

pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, APIErrors> {
    let service = UserService::new();

    let (user, token) = service.login(&payload.email, &payload.password).await?;
    let user = service.session_for(&user).await?;

    Ok(Json(AuthResponse {
        message: Some("Login successful".to_string()),
        user,
        token,
    }))
}

pub async fn logout(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    UserService::new().logout(&user).await?;

    Ok(MessageResponse::new("Successfully logged out."))
}

pub async fn current_user(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let user = UserService::new().session_for(&user).await?;

    Ok(Json(json!({ "user": user })))
}

pub async fn permissions(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let service = UserService::new();
    let permissions = service.permissions_for(&user).await?;
    let department_name = permissions.managed_department_name.clone();

    Ok(Json(json!({
        "user": session(&user, department_name),
        "permissions": permissions,
    })))
}
