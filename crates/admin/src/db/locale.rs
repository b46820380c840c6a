//! Locale resource storage.

use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryError;
use crate::services::LocaleStore;

/// `PostgreSQL`-backed locale resource store (single language).
#[derive(Clone)]
pub struct LocaleRepository {
    pool: PgPool,
}

impl LocaleRepository {
    /// Create a new locale repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocaleStore for LocaleRepository {
    async fn get_resource(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        let value = sqlx::query_scalar::<_, String>(
            r"
            SELECT value FROM admin.locale_resource
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn add_or_update_resource(&self, name: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO admin.locale_resource (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET value = $2
            ",
        )
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_resource(&self, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM admin.locale_resource WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
