//! Server-side registry of live refresh tokens.
//!
//! A refresh token is only honoured while it has an entry here. Logging out
//! deletes the entry, which revokes the token even though its signature stays
//! valid until it expires.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::AppError;

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Registers `token` as active for `user_id`, replacing any previous entry.
    async fn put(&self, token: &str, user_id: i32, ttl: Duration) -> Result<(), AppError>;

    /// Returns the owning user id while the entry is live.
    async fn get(&self, token: &str) -> Result<Option<i32>, AppError>;

    /// Revokes `token`. Deleting an unknown token is not an error.
    async fn delete(&self, token: &str) -> Result<(), AppError>;
}

/// Registry backed by the `refresh_sessions` table.
#[derive(Clone)]
pub struct PgSessionRegistry {
    pool: PgPool,
}

impl PgSessionRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Drops rows whose expiry has passed. Returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionRegistry for PgSessionRegistry {
    async fn put(&self, token: &str, user_id: i32, ttl: Duration) -> Result<(), AppError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::InternalServerError(format!("Invalid session TTL: {}", e)))?;
        let expires_at = Utc::now() + ttl;

        sqlx::query(
            "INSERT INTO refresh_sessions (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (token) DO UPDATE
             SET user_id = EXCLUDED.user_id, expires_at = EXCLUDED.expires_at",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        let purged = self.purge_expired().await?;
        if purged > 0 {
            log::debug!("purged {} expired refresh sessions", purged);
        }
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<i32>, AppError> {
        let row = sqlx::query_as::<_, (i32,)>(
            "SELECT user_id FROM refresh_sessions WHERE token = $1 AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id,)| user_id))
    }

    async fn delete(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM refresh_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-process registry. Expired entries are swept on every write.
#[derive(Default)]
pub struct MemorySessionRegistry {
    entries: RwLock<HashMap<String, (i32, Instant)>>,
}

impl MemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionRegistry for MemorySessionRegistry {
    async fn put(&self, token: &str, user_id: i32, ttl: Duration) -> Result<(), AppError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(token.to_string(), (user_id, now + ttl));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<i32>, AppError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(token)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(user_id, _)| *user_id))
    }

    async fn delete(&self, token: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    #[actix_rt::test]
    async fn test_put_get_delete() {
        let registry = MemorySessionRegistry::new();
        registry.put("tok", 5, WEEK).await.unwrap();
        assert_eq!(registry.get("tok").await.unwrap(), Some(5));

        registry.delete("tok").await.unwrap();
        assert_eq!(registry.get("tok").await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn test_delete_unknown_token_is_ok() {
        let registry = MemorySessionRegistry::new();
        assert!(registry.delete("never-issued").await.is_ok());
        assert!(registry.delete("never-issued").await.is_ok());
    }

    #[actix_rt::test]
    async fn test_put_overwrites_existing_entry() {
        let registry = MemorySessionRegistry::new();
        registry.put("tok", 1, WEEK).await.unwrap();
        registry.put("tok", 2, WEEK).await.unwrap();
        assert_eq!(registry.get("tok").await.unwrap(), Some(2));
        assert_eq!(registry.len().await, 1);
    }

    #[actix_rt::test]
    async fn test_expired_entries_are_absent_and_swept() {
        let registry = MemorySessionRegistry::new();
        registry.put("short", 1, Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(registry.get("short").await.unwrap(), None);

        registry.put("fresh", 2, WEEK).await.unwrap();
        assert_eq!(registry.len().await, 1);
    }
}
