use crate::api::config::Config;
use crate::data::models::roles::UserRole;
use crate::data::models::user::User;
use crate::security::errors::AuthError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub struct JwtService {
    secret: String,
    expiration_minutes: u64,
}

impl JwtService {
    pub fn new() -> Self {
        let config = Config::new();
        Self::with_secret(config.jwt_secret, config.jwt_expiration_minutes)
    }

    pub fn with_secret(secret: impl Into<String>, expiration_minutes: u64) -> Self {
        JwtService {
            secret: secret.into(),
            expiration_minutes,
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let curr_time = chrono::Utc::now().timestamp() as usize;

        let claims = AccessClaims {
            sub: user.user_id as usize,
            iat: curr_time,
            exp: curr_time + (self.expiration_minutes * 60) as usize,
            role: user.role,
            department_id: user.department_id,
            ver: user.token_version,
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|_| AuthError::TokenCreationError)?;

        tracing::debug!(user_id = user.user_id, "Token generated");

        Ok(token)
    }

    pub fn decode_token<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, AuthError> {
        let validation = Validation::default();

        let token_data = jsonwebtoken::decode::<T>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    pub role: UserRole,
    pub department_id: Option<i32>,
    /// Must match `users.token_version`; logout bumps it.
    pub ver: i32,
}

impl AccessClaims {
    pub fn user_id(&self) -> i32 {
        self.sub as i32
    }
}
