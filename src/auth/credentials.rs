use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::User;

/// Persistence for user accounts.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Creates a user. Fails with `AppError::Conflict` if the email is taken.
    async fn create(&self, name: &str, email: &str, password_hash: &str)
        -> Result<User, AppError>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        // The unique index still guards against a concurrent insert of the same email.
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("User already exists.".into()),
            other => other,
        })
    }
}

/// In-process user table for development and tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<Vec<User>>,
    last_id: AtomicI32,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user, as an administrator would. Used to exercise vanished-user paths.
    pub async fn remove(&self, id: i32) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != id);
        users.len() != before
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|user| user.email == email) {
            return Err(AppError::Conflict("User already exists.".into()));
        }

        let now = Utc::now();
        let user = User {
            id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}
