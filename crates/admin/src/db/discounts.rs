//! Discount and discount requirement repository.
//!
//! Discounts are owned by the host panel; this repository only reads them
//! and touches `updated_at` when a requirement is attached.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use discount_rules_core::{Discount, DiscountId, DiscountRequirement, DiscountRequirementId};

use super::RepositoryError;
use crate::services::DiscountStore;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct DiscountRow {
    id: i32,
    name: String,
    updated_at: DateTime<Utc>,
}

impl From<DiscountRow> for Discount {
    fn from(row: DiscountRow) -> Self {
        Self {
            id: DiscountId::new(row.id),
            name: row.name,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RequirementRow {
    id: i32,
    discount_id: i32,
    rule_system_name: String,
}

impl From<RequirementRow> for DiscountRequirement {
    fn from(row: RequirementRow) -> Self {
        Self {
            id: DiscountRequirementId::new(row.id),
            discount_id: DiscountId::new(row.discount_id),
            rule_system_name: row.rule_system_name,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL`-backed discount store.
#[derive(Clone)]
pub struct DiscountRepository {
    pool: PgPool,
}

impl DiscountRepository {
    /// Create a new discount repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiscountStore for DiscountRepository {
    async fn get_discount_by_id(&self, id: DiscountId) -> Result<Option<Discount>, RepositoryError> {
        let row = sqlx::query_as::<_, DiscountRow>(
            r"
            SELECT id, name, updated_at
            FROM admin.discount
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn update_discount(&self, discount: &Discount) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE admin.discount
            SET name = $2, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(discount.id)
        .bind(&discount.name)
        .bind(discount.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn get_requirement_by_id(
        &self,
        id: DiscountRequirementId,
    ) -> Result<Option<DiscountRequirement>, RepositoryError> {
        let row = sqlx::query_as::<_, RequirementRow>(
            r"
            SELECT id, discount_id, rule_system_name
            FROM admin.discount_requirement
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_requirement(
        &self,
        discount_id: DiscountId,
        rule_system_name: &str,
    ) -> Result<DiscountRequirement, RepositoryError> {
        let row = sqlx::query_as::<_, RequirementRow>(
            r"
            INSERT INTO admin.discount_requirement (discount_id, rule_system_name)
            VALUES ($1, $2)
            RETURNING id, discount_id, rule_system_name
            ",
        )
        .bind(discount_id)
        .bind(rule_system_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::Conflict(format!("discount {discount_id} does not exist"))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(row.into())
    }

    async fn delete_requirement(&self, id: DiscountRequirementId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            DELETE FROM admin.discount_requirement
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_all_requirements(
        &self,
        rule_system_name: Option<&str>,
    ) -> Result<Vec<DiscountRequirement>, RepositoryError> {
        let rows = sqlx::query_as::<_, RequirementRow>(
            r"
            SELECT id, discount_id, rule_system_name
            FROM admin.discount_requirement
            WHERE $1::text IS NULL OR rule_system_name = $1
            ORDER BY id
            ",
        )
        .bind(rule_system_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
