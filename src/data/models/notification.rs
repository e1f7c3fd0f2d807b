use crate::data::models::roles::UserRole;
use crate::data::models::schema::*;
use crate::utils::mappers::{ParseEnumError, varchar_enum};
use chrono::NaiveDateTime;
use diesel::deserialize::FromSqlRow;
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::sql_types::Text;

#[derive(AsExpression, FromSqlRow, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(sql_type = Text)]
pub enum NotificationType {
    OrderCreated,
    OrderStatusChanged,
    ReservationCreated,
    ReceiptUploaded,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::OrderCreated => "order_created",
            NotificationType::OrderStatusChanged => "order_status_changed",
            NotificationType::ReservationCreated => "reservation_created",
            NotificationType::ReceiptUploaded => "receipt_uploaded",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "order_created" => Ok(NotificationType::OrderCreated),
            "order_status_changed" => Ok(NotificationType::OrderStatusChanged),
            "reservation_created" => Ok(NotificationType::ReservationCreated),
            "receipt_uploaded" => Ok(NotificationType::ReceiptUploaded),
            other => Err(ParseEnumError {
                kind: "notification type",
                value: other.to_string(),
            }),
        }
    }
}

varchar_enum!(NotificationType);

/// A notification row, owned by `user_id`. Staff copies also record the
/// role and department they were addressed through.
#[derive(Queryable, Selectable, Identifiable, PartialEq, Debug, Clone)]
#[diesel(table_name = notifications)]
#[diesel(primary_key(notification_id))]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Notification {
    pub notification_id: i32,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub user_role: Option<UserRole>,
    pub department_id: Option<i32>,
    pub is_read: bool,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub user_id: Option<i32>,
    pub user_role: Option<UserRole>,
    pub department_id: Option<i32>,
}

#[derive(AsChangeset, PartialEq, Debug)]
#[diesel(table_name = notifications)]
pub struct UpdateNotification {
    pub is_read: Option<bool>,
    pub read_at: Option<Option<NaiveDateTime>>,
}
