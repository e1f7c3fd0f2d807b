use crate::api::errors::APIErrors;
use crate::data::models::user::User;
use crate::data::repos::implementors::user_repo::UserRepo;
use crate::data::repos::traits::repository::Repository;
use crate::security::errors::AuthError;
use crate::security::jwt::{AccessClaims, JwtService};
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

impl<S> FromRequestParts<S> for AccessClaims
where
    S: Send + Sync,
{
    type Rejection = APIErrors;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        decode_token_from_request_part(parts).await
    }
}

/// The authenticated caller, loaded fresh from the database.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = APIErrors;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims: AccessClaims = decode_token_from_request_part(parts).await?;

        let user = UserRepo::new()
            .get_by_id(claims.user_id())
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = claims.user_id(), "token for missing user");
                APIErrors::Unauthorized
            })?;

        if user.token_version != claims.ver {
            tracing::warn!(user_id = user.user_id, "revoked token presented");
            return Err(AuthError::TokenRevoked.into());
        }

        Ok(AuthUser(user))
    }
}

async fn decode_token_from_request_part<T>(parts: &mut Parts) -> Result<T, APIErrors>
where
    T: for<'de> serde::Deserialize<'de> + std::fmt::Debug + Sync + Send,
{
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| {
            tracing::debug!("missing or malformed authorization header");
            APIErrors::Unauthorized
        })?;

    let claims = JwtService::new().decode_token::<T>(bearer.token()).map_err(|e| {
        tracing::debug!(error = %e, "token rejected");
        APIErrors::Unauthorized
    })?;

    Ok(claims)
}
