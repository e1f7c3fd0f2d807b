use jsonwebtoken::{EncodingKey, Header};
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::User;
use merch_hub_lib::security::errors::AuthError;
use merch_hub_lib::security::jwt::{AccessClaims, JwtService};

const SECRET: &str = "test-secret";

fn user() -> User {
    User {
        user_id: 42,
        name: "Token Holder".to_string(),
        email: "holder@example.com".to_string(),
        password_hash: String::new(),
        role: UserRole::Admin,
        department_id: Some(3),
        token_version: 2,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_generate_and_decode_token() {
    let jwt = JwtService::with_secret(SECRET, 60);

    let token = jwt.generate_token(&user()).unwrap();
    let claims: AccessClaims = jwt.decode_token(&token).unwrap();

    assert_eq!(claims.user_id(), 42);
    assert_eq!(claims.role, UserRole::Admin);
    assert_eq!(claims.department_id, Some(3));
    assert_eq!(claims.ver, 2);
    assert_eq!(claims.exp - claims.iat, 60 * 60);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let token = JwtService::with_secret("another-secret", 60)
        .generate_token(&user())
        .unwrap();

    let result = JwtService::with_secret(SECRET, 60).decode_token::<AccessClaims>(&token);

    assert!(matches!(result, Err(AuthError::InvalidToken)));
}

#[test]
fn test_expired_token_is_reported() {
    let issued = chrono::Utc::now().timestamp() as usize - 2 * 60 * 60;
    let claims = AccessClaims {
        sub: 42,
        iat: issued,
        exp: issued + 60 * 60,
        role: UserRole::Student,
        department_id: None,
        ver: 0,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_ref()),
    )
    .unwrap();

    let result = JwtService::with_secret(SECRET, 60).decode_token::<AccessClaims>(&token);

    assert!(matches!(result, Err(AuthError::TokenExpired)));
}

#[test]
fn test_garbage_token_is_invalid() {
    let result = JwtService::with_secret(SECRET, 60).decode_token::<AccessClaims>("not.a.jwt");

    assert!(matches!(result, Err(AuthError::InvalidToken)));
}
