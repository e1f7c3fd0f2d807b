use crate::api::controllers::dto::user_dto::UserSession;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body of register and login.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub message: Option<String>,
    pub user: UserSession,
    pub token: String,
}

/// `{ "message": ..., "<key>": <payload> }`, the envelope every mutation returns.
pub fn with_message<T: Serialize>(status: StatusCode, message: &str, key: &str, payload: T) -> Response {
    let mut body = serde_json::Map::new();
    body.insert("message".to_string(), serde_json::Value::from(message));
    match serde_json::to_value(payload) {
        Ok(value) => {
            body.insert(key.to_string(), value);
        }
        Err(e) => {
            tracing::error!(error = %e, key, "failed to serialize response payload");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    (status, Json(serde_json::Value::Object(body))).into_response()
}
