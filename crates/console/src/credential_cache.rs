//! SQLite-backed credential slot, so a session survives a restart.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use tallerpro_auth::{CredentialStore, CredentialStoreError, StoredCredential};

/// Fixed key the credential lives under.
pub const SESSION_KEY: &str = "session";

fn unavailable(context: &str, err: impl std::fmt::Display) -> CredentialStoreError {
    CredentialStoreError::Unavailable(format!("{context}: {err}"))
}

#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self, CredentialStoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| unavailable(&format!("failed to create {}", parent.display()), e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| unavailable(&format!("failed to open {}", path.display()), e))?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database. One connection, kept for the pool's life.
    pub async fn in_memory() -> Result<Self, CredentialStoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| unavailable("failed to open in-memory database", e))?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, CredentialStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS credentials (
                key       TEXT NOT NULL PRIMARY KEY,
                value     TEXT NOT NULL,
                stored_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| unavailable("failed to create credentials table", e))?;

        Ok(Self { pool })
    }

    /// Write a raw value under the session key. Lets tests plant a bad row.
    #[cfg(test)]
    async fn put_raw(&self, value: &str) -> Result<(), CredentialStoreError> {
        self.upsert(value).await
    }

    async fn upsert(&self, value: &str) -> Result<(), CredentialStoreError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (key, value, stored_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                stored_at = excluded.stored_at
            "#,
        )
        .bind(SESSION_KEY)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("failed to store credential", e))?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredential>, CredentialStoreError> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM credentials
            WHERE key = ?1
            "#,
        )
        .bind(SESSION_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unavailable("failed to read credential", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let value: String = row
            .try_get("value")
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))?;
        serde_json::from_str(&value)
            .map(Some)
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))
    }

    async fn save(&self, credential: &StoredCredential) -> Result<(), CredentialStoreError> {
        let value = serde_json::to_string(credential)
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))?;
        self.upsert(&value).await
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        sqlx::query(
            r#"
            DELETE FROM credentials
            WHERE key = ?1
            "#,
        )
        .bind(SESSION_KEY)
        .execute(&self.pool)
        .await
        .map_err(|e| unavailable("failed to clear credential", e))?;
        Ok(())
    }
}
