use crate::auth::create_access_token;
use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tollgate_common::models::auth::{NewUser, User};

pub const MISSING_CREDENTIALS: &str = "Please provide email and password";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

/// Envelope shared by signup and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: &'static str,
    pub token: String,
    pub data: UserData,
}

fn token_response(
    user: User,
    status: StatusCode,
    auth_config: &AuthConfig,
) -> Result<Response, ApiError> {
    let token = create_access_token(user.user_id, auth_config)?;
    let body = TokenResponse {
        status: "success",
        token,
        data: UserData { user },
    };
    Ok((status, Json(body)).into_response())
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// POST /api/v1/users/signup
#[tracing::instrument(skip(state, body))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let record = state.users.create(req).await?;
    tracing::info!("Registered user {}", record.user_id);
    token_response(record.into(), StatusCode::CREATED, &state.config.auth)
}

/// POST /api/v1/users/login
#[tracing::instrument(skip(state, body))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(ApiError::validation(MISSING_CREDENTIALS));
    };

    let Some(mut record) = state.users.find_by_email(&email, true).await? else {
        return Err(ApiError::authentication(INVALID_CREDENTIALS));
    };

    let Some(hash) = record.password_hash.take() else {
        return Err(ApiError::authentication(INVALID_CREDENTIALS));
    };

    if !state.users.correct_password(&password, &hash).await? {
        return Err(ApiError::authentication(INVALID_CREDENTIALS));
    }

    tracing::debug!("User {} logged in", record.user_id);
    token_response(record.into(), StatusCode::OK, &state.config.auth)
}

/// GET /api/v1/users/me
#[tracing::instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "data": { "user": user },
    }))
}
