use crate::auth::{validate_access_token, TokenError};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tollgate_common::models::auth::User;
use uuid::Uuid;

pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access";
pub const INVALID_TOKEN: &str = "Invalid token. Please log in again";
pub const EXPIRED_TOKEN: &str = "Your token has expired! Please log in again";
pub const USER_NO_LONGER_EXISTS: &str = "The user belonging to this token no longer exists";

/// The user resolved by [`require_auth`], stored in request extensions.
/// Handlers behind the guard take it as an extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::authentication(NOT_LOGGED_IN))
    }
}

/// Pull the token out of `Authorization: <scheme> <token>`.
/// The scheme must match exactly and be followed by whitespace.
pub fn extract_token<'a>(headers: &'a HeaderMap, scheme: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let rest = value.strip_prefix(scheme)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Run the access gates against a request's headers: extract, verify,
/// re-resolve. Returns the user the token belongs to.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let auth_config = &state.config.auth;

    let token = extract_token(headers, &auth_config.header_scheme).ok_or_else(|| {
        tracing::debug!("Rejected request without usable authorization header");
        ApiError::authentication(NOT_LOGGED_IN)
    })?;

    let claims = validate_access_token(token, auth_config).map_err(|e| {
        tracing::debug!("Rejected token: {:?}", e);
        match e {
            TokenError::Expired => ApiError::authentication(EXPIRED_TOKEN),
            TokenError::Invalid => ApiError::authentication(INVALID_TOKEN),
        }
    })?;

    // A correctly signed subject that is not a UUID cannot name a live user
    let user_id: Uuid = claims
        .sub
        .parse()
        .map_err(|_| ApiError::authentication(USER_NO_LONGER_EXISTS))?;

    match state.users.find_by_id(user_id).await? {
        Some(record) => Ok(record.into()),
        None => {
            tracing::debug!("Token subject {} no longer exists", user_id);
            Err(ApiError::authentication(USER_NO_LONGER_EXISTS))
        }
    }
}

/// Access guard: attaches [`CurrentUser`] and continues, or short-circuits with 401
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_token(&headers, "Bearer"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_extract_custom_scheme() {
        let headers = headers_with("Route abc.def.ghi");
        assert_eq!(extract_token(&headers, "Route"), Some("abc.def.ghi"));
        assert_eq!(extract_token(&headers, "Bearer"), None);
    }

    #[test]
    fn test_extract_missing_header() {
        assert_eq!(extract_token(&HeaderMap::new(), "Bearer"), None);
    }

    #[test]
    fn test_extract_scheme_without_token() {
        assert_eq!(extract_token(&headers_with("Bearer"), "Bearer"), None);
        assert_eq!(extract_token(&headers_with("Bearer   "), "Bearer"), None);
    }

    #[test]
    fn test_extract_scheme_must_be_whole_word() {
        assert_eq!(extract_token(&headers_with("Bearerabc"), "Bearer"), None);
    }

    #[test]
    fn test_extract_rejects_extra_parts() {
        assert_eq!(extract_token(&headers_with("Bearer abc def"), "Bearer"), None);
    }
}
