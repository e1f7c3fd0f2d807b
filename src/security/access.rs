use crate::data::models::roles::UserRole;
use crate::data::models::user::User;
use crate::security::errors::AccessDenied;

pub const STAFF: &[UserRole] = &[UserRole::Admin, UserRole::SuperAdmin];
pub const SUPERADMIN_ONLY: &[UserRole] = &[UserRole::SuperAdmin];
pub const ANY_ROLE: &[UserRole] = &[UserRole::Student, UserRole::Admin, UserRole::SuperAdmin];

pub fn require_role(user: &User, allowed: &[UserRole]) -> Result<(), AccessDenied> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    tracing::warn!(
        user_id = user.user_id,
        role = user.role.as_str(),
        "role check refused"
    );
    Err(AccessDenied::Role(allowed.to_vec()))
}

/// Department gate: superadmins pass everywhere, admins only for their own department.
pub fn require_department(user: &User, department_id: i32, action: &str) -> Result<(), AccessDenied> {
    if user.can_manage_department(department_id) {
        return Ok(());
    }

    tracing::warn!(
        user_id = user.user_id,
        department_id,
        action,
        "department check refused"
    );
    Err(AccessDenied::Department {
        department_id,
        action: action.to_string(),
    })
}
