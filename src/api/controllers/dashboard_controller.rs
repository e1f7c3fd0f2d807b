use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::response::MessageResponse;
use crate::services::dashboard_service::DashboardService;
use axum::Json;
use axum::response::IntoResponse;

pub async fn ping() -> MessageResponse {
    MessageResponse::new("pong")
}

pub async fn dashboard_stats(AuthUser(actor): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let stats = DashboardService::new().stats(&actor).await?;

    Ok(Json(stats))
}
