//! User storage seam.
//!
//! The auth flows only talk to [`UserStore`]. Creation owns field validation,
//! confirmation matching and password hashing so the handlers stay thin.

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tollgate_common::models::auth::{NewUser, User};
use uuid::Uuid;

/// A stored user. `password_hash` is only populated when explicitly requested.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            user_id: record.user_id,
            name: record.name,
            email: record.email,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => ApiError::Validation(msg),
            e @ StoreError::DuplicateEmail(_) => ApiError::Conflict(e.to_string()),
            StoreError::Unexpected(e) => ApiError::Internal(e),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Validate, hash and persist a new user. The returned record carries no hash.
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError>;

    /// Look up by email (case-insensitive). The hash is included only when
    /// `include_hash` is set.
    async fn find_by_email(
        &self,
        email: &str,
        include_hash: bool,
    ) -> anyhow::Result<Option<UserRecord>>;

    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<UserRecord>>;

    /// Compare a candidate password with a stored hash off the async runtime
    async fn correct_password(&self, candidate: &str, hash: &str) -> anyhow::Result<bool> {
        let candidate = candidate.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .context("Password verification task failed")?
    }
}

/// argon2 is CPU bound; keep it off the async workers
pub(crate) async fn hash_in_background(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task failed")?
}
