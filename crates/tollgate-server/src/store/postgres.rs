use super::{hash_in_background, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use sqlx::PgPool;
use tollgate_common::models::auth::NewUser;
use tollgate_common::validation::{normalize_email, validate_new_user};
use tollgate_db::{is_unique_violation, UserRepo, UserRow};
use uuid::Uuid;

/// User store backed by the `user` table
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_record(row: UserRow, include_hash: bool) -> UserRecord {
    UserRecord {
        user_id: row.user_id,
        name: row.name,
        email: row.email,
        password_hash: include_hash.then_some(row.password_hash),
        created_at: row.created_at,
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[tracing::instrument(skip(self, new_user))]
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        validate_new_user(&new_user).map_err(|e| StoreError::Validation(e.to_string()))?;
        let email = normalize_email(&new_user.email);
        let password_hash = hash_in_background(new_user.password).await?;

        match UserRepo::create(
            &self.pool,
            Uuid::new_v4(),
            new_user.name.trim(),
            &email,
            &password_hash,
        )
        .await
        {
            Ok(row) => Ok(to_record(row, false)),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateEmail(email)),
            Err(e) => Err(StoreError::Unexpected(e)),
        }
    }

    async fn find_by_email(
        &self,
        email: &str,
        include_hash: bool,
    ) -> anyhow::Result<Option<UserRecord>> {
        let row = UserRepo::get_by_email(&self.pool, &normalize_email(email)).await?;
        Ok(row.map(|r| to_record(r, include_hash)))
    }

    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        let row = UserRepo::get_by_id(&self.pool, user_id).await?;
        Ok(row.map(|r| to_record(r, false)))
    }
}
