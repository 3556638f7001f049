use crate::config::AuthConfig;
use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use tollgate_common::models::auth::Claims;
use uuid::Uuid;

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Why a presented token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

/// Create an access token (JWT) for a user, valid for `token_ttl_secs`
pub fn create_access_token(user_id: Uuid, auth: &AuthConfig) -> Result<String> {
    create_access_token_at(user_id, auth, Utc::now())
}

/// Same as [`create_access_token`] with an explicit issue time
pub fn create_access_token_at(
    user_id: Uuid,
    auth: &AuthConfig,
    issued_at: DateTime<Utc>,
) -> Result<String> {
    let iat = issued_at.timestamp();
    let ttl = i64::try_from(auth.token_ttl_secs).context("Token TTL out of range")?;
    let claims = Claims {
        sub: user_id.to_string(),
        iat,
        exp: iat.saturating_add(ttl),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .context("Failed to create access token")
}

/// Validate an access token's signature and expiry and return its claims
pub fn validate_access_token(token: &str, auth: &AuthConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}
