//! Settings database operations.
//!
//! Settings are global key/value pairs. Requirement rules namespace their
//! keys by requirement ID.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::RepositoryError;
use crate::services::SettingStore;

/// `PostgreSQL`-backed setting store.
#[derive(Clone)]
pub struct SettingRepository {
    pool: PgPool,
}

impl SettingRepository {
    /// Create a new setting repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingStore for SettingRepository {
    async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let result = sqlx::query_scalar::<_, JsonValue>(
            r"
            SELECT value FROM admin.setting
            WHERE key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn set_setting(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO admin.setting (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM admin.setting
            WHERE key = $1
            ",
        )
        .bind(key)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
