//! Host collaborator interfaces.
//!
//! The rule never owns discounts, settings, countries, addresses or locale
//! strings; it reaches them through these traits. Production wires the
//! `PostgreSQL` repositories from [`crate::db`], tests wire [`MemoryHost`].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use discount_rules_core::{
    Address, AddressId, Country, CountryId, Discount, DiscountId, DiscountRequirement,
    DiscountRequirementId,
};

use crate::db::{
    DirectoryRepository, DiscountRepository, LocaleRepository, RepositoryError, SettingRepository,
};

pub use memory::MemoryHost;

/// Untyped key/value settings storage.
#[async_trait]
pub trait SettingStore: Send + Sync {
    /// Get a setting value, `None` if the key was never written.
    async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError>;

    /// Insert or overwrite a setting value.
    async fn set_setting(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError>;

    /// Delete a setting. Deleting a missing key is not an error.
    async fn delete_setting(&self, key: &str) -> Result<(), RepositoryError>;
}

/// Discount and requirement persistence.
#[async_trait]
pub trait DiscountStore: Send + Sync {
    async fn get_discount_by_id(&self, id: DiscountId) -> Result<Option<Discount>, RepositoryError>;

    /// Persist changes to a discount. Fails with `NotFound` if it no longer exists.
    async fn update_discount(&self, discount: &Discount) -> Result<(), RepositoryError>;

    async fn get_requirement_by_id(
        &self,
        id: DiscountRequirementId,
    ) -> Result<Option<DiscountRequirement>, RepositoryError>;

    /// Create a requirement for a discount; the store assigns its ID.
    async fn insert_requirement(
        &self,
        discount_id: DiscountId,
        rule_system_name: &str,
    ) -> Result<DiscountRequirement, RepositoryError>;

    async fn delete_requirement(&self, id: DiscountRequirementId) -> Result<(), RepositoryError>;

    /// List requirements, optionally only those evaluated by one rule.
    async fn get_all_requirements(
        &self,
        rule_system_name: Option<&str>,
    ) -> Result<Vec<DiscountRequirement>, RepositoryError>;
}

/// Country reference data.
#[async_trait]
pub trait CountryDirectory: Send + Sync {
    /// All countries, including unpublished ones, in display order.
    async fn get_all_countries(&self) -> Result<Vec<Country>, RepositoryError>;

    async fn get_country_by_id(&self, id: CountryId) -> Result<Option<Country>, RepositoryError>;
}

/// Customer address lookup.
#[async_trait]
pub trait AddressDirectory: Send + Sync {
    async fn get_address_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError>;
}

/// Localized UI strings.
#[async_trait]
pub trait LocaleStore: Send + Sync {
    async fn get_resource(&self, name: &str) -> Result<Option<String>, RepositoryError>;

    async fn add_or_update_resource(&self, name: &str, value: &str) -> Result<(), RepositoryError>;

    async fn delete_resource(&self, name: &str) -> Result<(), RepositoryError>;
}

/// The set of host collaborators a rule works against.
#[derive(Clone)]
pub struct HostServices {
    pub settings: Arc<dyn SettingStore>,
    pub discounts: Arc<dyn DiscountStore>,
    pub countries: Arc<dyn CountryDirectory>,
    pub addresses: Arc<dyn AddressDirectory>,
    pub locales: Arc<dyn LocaleStore>,
}

impl HostServices {
    /// Collaborators backed by the `PostgreSQL` repositories.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        let directory = Arc::new(DirectoryRepository::new(pool.clone()));
        Self {
            settings: Arc::new(SettingRepository::new(pool.clone())),
            discounts: Arc::new(DiscountRepository::new(pool.clone())),
            countries: directory.clone(),
            addresses: directory,
            locales: Arc::new(LocaleRepository::new(pool.clone())),
        }
    }

    /// Collaborators backed by a single in-memory host.
    #[must_use]
    pub fn in_memory(host: Arc<MemoryHost>) -> Self {
        Self {
            settings: host.clone(),
            discounts: host.clone(),
            countries: host.clone(),
            addresses: host.clone(),
            locales: host,
        }
    }
}
