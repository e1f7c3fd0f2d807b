use crate::data::models::roles::UserRole;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub department_id: i32,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub department_id: i32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub department_id: Option<i32>,
}

/// Session view of a user, as returned by login, register and `/api/user`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsDTO {
    pub is_super_admin: bool,
    pub is_admin: bool,
    pub is_student: bool,
    pub can_manage_users: bool,
    pub can_manage_departments: bool,
    pub can_approve_listings: bool,
    pub can_create_listings: bool,
    pub managed_department_id: Option<i32>,
    pub managed_department_name: Option<String>,
}
