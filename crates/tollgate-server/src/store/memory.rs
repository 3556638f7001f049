use super::{hash_in_background, StoreError, UserRecord, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tollgate_common::models::auth::NewUser;
use tollgate_common::validation::{normalize_email, validate_new_user};
use uuid::Uuid;

/// Process-local user store, used when no database is configured
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user. Returns true if one was removed.
    pub async fn remove(&self, user_id: Uuid) -> bool {
        self.users.write().await.remove(&user_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn without_hash(record: &UserRecord) -> UserRecord {
    UserRecord {
        password_hash: None,
        ..record.clone()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        validate_new_user(&new_user).map_err(|e| StoreError::Validation(e.to_string()))?;
        let email = normalize_email(&new_user.email);
        let password_hash = hash_in_background(new_user.password).await?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail(email));
        }
        let record = UserRecord {
            user_id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email,
            password_hash: Some(password_hash),
            created_at: Utc::now(),
        };
        users.insert(record.user_id, record.clone());
        Ok(without_hash(&record))
    }

    async fn find_by_email(
        &self,
        email: &str,
        include_hash: bool,
    ) -> anyhow::Result<Option<UserRecord>> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).map(|u| {
            if include_hash {
                u.clone()
            } else {
                without_hash(u)
            }
        }))
    }

    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).map(without_hash))
    }
}
