use crate::api::controllers::dto::notification_dto::{
    MarkReadRequest, NotificationDTO, NotificationListResponse, NotificationQuery,
};
use crate::api::errors::APIErrors;
use crate::api::extractors::AuthUser;
use crate::api::response::MessageResponse;
use crate::services::notification_service::NotificationService;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use serde_json::json;

pub async fn get_notifications(
    AuthUser(user): AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<impl IntoResponse, APIErrors> {
    let (notifications, unread_count) = NotificationService::new().list(&user, query.limit).await?;

    Ok(Json(NotificationListResponse {
        notifications: notifications.into_iter().map(NotificationDTO::from).collect(),
        unread_count,
    }))
}

pub async fn unread_count(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let count = NotificationService::new().unread_count(&user).await?;

    Ok(Json(json!({ "unread_count": count })))
}

/// Body is optional; no ids means every notification of the caller.
pub async fn mark_read(
    AuthUser(user): AuthUser,
    body: Bytes,
) -> Result<impl IntoResponse, APIErrors> {
    let ids = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<MarkReadRequest>(&body)
            .map_err(|e| APIErrors::Unprocessable(format!("Invalid request body: {e}")))?
            .notification_ids
    };
    let updated = NotificationService::new().mark_read(&user, ids).await?;

    Ok(Json(json!({
        "message": "Notifications marked as read",
        "updated_count": updated,
    })))
}

pub async fn mark_one_read(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    NotificationService::new().mark_one_read(&user, id).await?;

    Ok(MessageResponse::new("Notification marked as read"))
}

pub async fn delete_notification(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, APIErrors> {
    NotificationService::new().delete(&user, id).await?;

    Ok(MessageResponse::new("Notification deleted"))
}

pub async fn clear_notifications(AuthUser(user): AuthUser) -> Result<impl IntoResponse, APIErrors> {
    let deleted = NotificationService::new().delete_all(&user).await?;

    Ok(Json(json!({
        "message": "All notifications cleared",
        "deleted_count": deleted,
    })))
}
