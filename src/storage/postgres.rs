//! PostgreSQL identity store.
//!
//! Identity keys live in `seen_threads`, unique on the full key, so `record`
//! is an upsert and never duplicates a row.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::error::{AppError, Result};
use crate::models::IdentityKey;
use crate::storage::IdentityStore;

pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    /// Connect to the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(AppError::store)?;
        Ok(Self { pool })
    }

    /// Create the `seen_threads` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_threads (
                id BIGSERIAL PRIMARY KEY,
                source_group TEXT NOT NULL,
                title TEXT NOT NULL,
                observed_date DATE NOT NULL,
                recorded_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
                UNIQUE (source_group, title, observed_date)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn exists(&self, key: &IdentityKey) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM seen_threads
            WHERE source_group = $1
              AND title = $2
              AND observed_date = $3
            "#,
        )
        .bind(&key.source_group)
        .bind(&key.title)
        .bind(key.observed_date)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::store)?;

        let count: i64 = row.try_get("count").map_err(AppError::store)?;
        Ok(count > 0)
    }

    async fn record(&self, key: &IdentityKey) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO seen_threads (source_group, title, observed_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (source_group, title, observed_date) DO NOTHING
            "#,
        )
        .bind(&key.source_group)
        .bind(&key.title)
        .bind(key.observed_date)
        .execute(&self.pool)
        .await
        .map_err(AppError::store)?;
        Ok(())
    }
}
