//! Country and address directory (read-only).

use async_trait::async_trait;
use sqlx::PgPool;

use discount_rules_core::{Address, AddressId, Country, CountryId};

use super::RepositoryError;
use crate::services::{AddressDirectory, CountryDirectory};

#[derive(Debug, sqlx::FromRow)]
struct CountryRow {
    id: i32,
    name: String,
    two_letter_iso_code: String,
    display_order: i32,
    published: bool,
}

impl TryFrom<CountryRow> for Country {
    type Error = RepositoryError;

    fn try_from(row: CountryRow) -> Result<Self, Self::Error> {
        if row.two_letter_iso_code.len() != 2 {
            return Err(RepositoryError::DataCorruption(format!(
                "country {} has invalid ISO code '{}'",
                row.id, row.two_letter_iso_code
            )));
        }

        Ok(Self {
            id: CountryId::new(row.id),
            name: row.name,
            two_letter_iso_code: row.two_letter_iso_code,
            display_order: row.display_order,
            published: row.published,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    country_id: Option<i32>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            country_id: row.country_id.and_then(CountryId::non_zero),
        }
    }
}

/// `PostgreSQL`-backed country and address directory.
#[derive(Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryDirectory for DirectoryRepository {
    async fn get_all_countries(&self) -> Result<Vec<Country>, RepositoryError> {
        // Hidden (unpublished) countries are included; the admin may target any of them.
        let rows = sqlx::query_as::<_, CountryRow>(
            r"
            SELECT id, name, two_letter_iso_code, display_order, published
            FROM admin.country
            ORDER BY display_order, name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get_country_by_id(&self, id: CountryId) -> Result<Option<Country>, RepositoryError> {
        let row = sqlx::query_as::<_, CountryRow>(
            r"
            SELECT id, name, two_letter_iso_code, display_order, published
            FROM admin.country
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[async_trait]
impl AddressDirectory for DirectoryRepository {
    async fn get_address_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, country_id
            FROM admin.address
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
