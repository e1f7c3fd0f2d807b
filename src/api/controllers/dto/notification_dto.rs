use crate::data::models::notification::NotificationType;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotificationDTO {
    pub id: i32,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub read_at: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct MarkReadRequest {
    pub notification_ids: Option<Vec<i32>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationDTO>,
    pub unread_count: i64,
}
