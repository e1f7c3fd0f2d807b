use crate::data::models::roles::UserRole;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Password hashing failed")]
    HashingError,
    #[error("Password verification failed")]
    VerificationError,
    #[error("Invalid credentials provided.")]
    InvalidCredentials,
    #[error("User not found.")]
    UserNotFound,
    #[error("Authentication token has expired.")]
    TokenExpired,
    #[error("Authentication token has been revoked.")]
    TokenRevoked,
    #[error("Token creation failed")]
    TokenCreationError,
    #[error("Invalid token credentials provided.")]
    InvalidToken,
}

/// A role or department gate refused the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("This action requires one of the roles: {}", format_roles(.0))]
    Role(Vec<UserRole>),
    #[error("You do not have permission to {action} for this department")]
    Department { department_id: i32, action: String },
}

fn format_roles(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
