//! In-memory host collaborators.
//!
//! Implements every collaborator trait over `tokio::sync::RwLock` maps so the
//! rule and its routes can run without a database (tests, CLI dry runs).

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use discount_rules_core::{
    Address, AddressId, Country, CountryId, Discount, DiscountId, DiscountRequirement,
    DiscountRequirementId,
};

use super::{AddressDirectory, CountryDirectory, DiscountStore, LocaleStore, SettingStore};
use crate::db::RepositoryError;

pub struct MemoryHost {
    settings: RwLock<HashMap<String, JsonValue>>,
    discounts: RwLock<BTreeMap<DiscountId, Discount>>,
    requirements: RwLock<BTreeMap<DiscountRequirementId, DiscountRequirement>>,
    countries: RwLock<Vec<Country>>,
    addresses: RwLock<HashMap<AddressId, Address>>,
    locales: RwLock<HashMap<String, String>>,
    next_requirement_id: AtomicI32,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            settings: RwLock::new(HashMap::new()),
            discounts: RwLock::new(BTreeMap::new()),
            requirements: RwLock::new(BTreeMap::new()),
            countries: RwLock::new(Vec::new()),
            addresses: RwLock::new(HashMap::new()),
            locales: RwLock::new(HashMap::new()),
            next_requirement_id: AtomicI32::new(1),
        }
    }
}

impl MemoryHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a discount with the given ID.
    pub async fn add_discount(&self, id: i32, name: &str) -> Discount {
        let discount = Discount {
            id: DiscountId::new(id),
            name: name.to_string(),
            updated_at: Utc::now(),
        };
        self.discounts
            .write()
            .await
            .insert(discount.id, discount.clone());
        discount
    }

    /// Add (or replace) a published country with display order 0.
    pub async fn add_country(&self, id: i32, name: &str, iso: &str) -> Country {
        let mut countries = self.countries.write().await;
        let country = Country {
            id: CountryId::new(id),
            name: name.to_string(),
            two_letter_iso_code: iso.to_string(),
            display_order: 0,
            published: true,
        };
        countries.retain(|c| c.id != country.id);
        countries.push(country.clone());
        country
    }

    /// Add an address, optionally in a country.
    pub async fn add_address(&self, id: i32, country_id: Option<i32>) -> Address {
        let address = Address {
            id: AddressId::new(id),
            country_id: country_id.and_then(CountryId::non_zero),
        };
        self.addresses
            .write()
            .await
            .insert(address.id, address.clone());
        address
    }

    /// Add a requirement with a fixed ID (seeding pre-existing host data).
    pub async fn add_requirement(
        &self,
        id: i32,
        discount_id: i32,
        rule_system_name: &str,
    ) -> DiscountRequirement {
        let requirement = DiscountRequirement {
            id: DiscountRequirementId::new(id),
            discount_id: DiscountId::new(discount_id),
            rule_system_name: rule_system_name.to_string(),
        };
        self.requirements
            .write()
            .await
            .insert(requirement.id, requirement.clone());
        self.next_requirement_id.fetch_max(id + 1, Ordering::SeqCst);
        requirement
    }

    /// Snapshot of all requirements, ordered by ID.
    pub async fn requirements(&self) -> Vec<DiscountRequirement> {
        self.requirements.read().await.values().cloned().collect()
    }

    /// Snapshot of a discount.
    pub async fn discount(&self, id: i32) -> Option<Discount> {
        self.discounts.read().await.get(&DiscountId::new(id)).cloned()
    }

    /// Raw setting value.
    pub async fn setting(&self, key: &str) -> Option<JsonValue> {
        self.settings.read().await.get(key).cloned()
    }

    /// Number of stored settings.
    pub async fn setting_count(&self) -> usize {
        self.settings.read().await.len()
    }

    /// Raw locale resource value.
    pub async fn locale(&self, name: &str) -> Option<String> {
        self.locales.read().await.get(name).cloned()
    }
}

#[async_trait]
impl SettingStore for MemoryHost {
    async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        Ok(self.settings.read().await.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &JsonValue) -> Result<(), RepositoryError> {
        self.settings
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete_setting(&self, key: &str) -> Result<(), RepositoryError> {
        self.settings.write().await.remove(key);
        Ok(())
    }
}

#[async_trait]
impl DiscountStore for MemoryHost {
    async fn get_discount_by_id(&self, id: DiscountId) -> Result<Option<Discount>, RepositoryError> {
        Ok(self.discounts.read().await.get(&id).cloned())
    }

    async fn update_discount(&self, discount: &Discount) -> Result<(), RepositoryError> {
        let mut discounts = self.discounts.write().await;
        let existing = discounts
            .get_mut(&discount.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = discount.clone();
        Ok(())
    }

    async fn get_requirement_by_id(
        &self,
        id: DiscountRequirementId,
    ) -> Result<Option<DiscountRequirement>, RepositoryError> {
        Ok(self.requirements.read().await.get(&id).cloned())
    }

    async fn insert_requirement(
        &self,
        discount_id: DiscountId,
        rule_system_name: &str,
    ) -> Result<DiscountRequirement, RepositoryError> {
        if !self.discounts.read().await.contains_key(&discount_id) {
            return Err(RepositoryError::Conflict(format!(
                "discount {discount_id} does not exist"
            )));
        }

        let id = self.next_requirement_id.fetch_add(1, Ordering::SeqCst);
        let requirement = DiscountRequirement {
            id: DiscountRequirementId::new(id),
            discount_id,
            rule_system_name: rule_system_name.to_string(),
        };
        self.requirements
            .write()
            .await
            .insert(requirement.id, requirement.clone());
        Ok(requirement)
    }

    async fn delete_requirement(&self, id: DiscountRequirementId) -> Result<(), RepositoryError> {
        self.requirements.write().await.remove(&id);
        Ok(())
    }

    async fn get_all_requirements(
        &self,
        rule_system_name: Option<&str>,
    ) -> Result<Vec<DiscountRequirement>, RepositoryError> {
        Ok(self
            .requirements
            .read()
            .await
            .values()
            .filter(|r| rule_system_name.is_none_or(|name| r.rule_system_name == name))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CountryDirectory for MemoryHost {
    async fn get_all_countries(&self) -> Result<Vec<Country>, RepositoryError> {
        let mut countries = self.countries.read().await.clone();
        countries.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(countries)
    }

    async fn get_country_by_id(&self, id: CountryId) -> Result<Option<Country>, RepositoryError> {
        Ok(self
            .countries
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

#[async_trait]
impl AddressDirectory for MemoryHost {
    async fn get_address_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        Ok(self.addresses.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl LocaleStore for MemoryHost {
    async fn get_resource(&self, name: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.locales.read().await.get(name).cloned())
    }

    async fn add_or_update_resource(&self, name: &str, value: &str) -> Result<(), RepositoryError> {
        self.locales
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_resource(&self, name: &str) -> Result<(), RepositoryError> {
        self.locales.write().await.remove(name);
        Ok(())
    }
}
