use crate::utils::mappers::{ParseEnumError, varchar_enum};
use diesel::expression::AsExpression;
use diesel::deserialize::FromSqlRow;
use diesel::sql_types::Text;

/// Account roles, stored lowercase in `users.role`.
#[derive(AsExpression, FromSqlRow, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[diesel(sql_type = Text)]
pub enum UserRole {
    #[default]
    Student,
    Admin,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "superadmin",
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "admin" => Ok(UserRole::Admin),
            "superadmin" | "super_admin" => Ok(UserRole::SuperAdmin),
            other => Err(ParseEnumError {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

varchar_enum!(UserRole);
