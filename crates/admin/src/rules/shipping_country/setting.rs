//! Typed view of the per-requirement shipping country setting.
//!
//! The host stores the value as an integer under
//! `DiscountRequirement.ShippingCountry-{id}` where `0` means "not
//! configured". That sentinel is translated to `None` here and nowhere else.

use serde_json::Value as JsonValue;

use discount_rules_core::{CountryId, DiscountRequirementId};

use super::defaults;
use crate::db::RepositoryError;
use crate::services::SettingStore;

/// The configured country of one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingCountrySetting {
    pub requirement_id: DiscountRequirementId,
    pub country_id: Option<CountryId>,
}

impl ShippingCountrySetting {
    #[must_use]
    pub const fn new(requirement_id: DiscountRequirementId, country_id: Option<CountryId>) -> Self {
        Self {
            requirement_id,
            country_id,
        }
    }

    #[must_use]
    pub fn key(&self) -> String {
        key_for(self.requirement_id)
    }

    /// Load the setting; a missing row reads as unconfigured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored value is not a country ID.
    pub async fn load(
        store: &dyn SettingStore,
        requirement_id: DiscountRequirementId,
    ) -> Result<Self, RepositoryError> {
        let key = key_for(requirement_id);
        let country_id = match store.get_setting(&key).await? {
            Some(value) => decode_country(&key, &value)?,
            None => None,
        };
        Ok(Self::new(requirement_id, country_id))
    }

    /// Write the setting, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub async fn save(&self, store: &dyn SettingStore) -> Result<(), RepositoryError> {
        let value = JsonValue::from(self.country_id.map_or(0, |id| id.as_i32()));
        store.set_setting(&self.key(), &value).await
    }

    /// Remove the setting row for a requirement.
    ///
    /// # Errors
    ///
    /// Returns an error if the store delete fails.
    pub async fn delete(
        store: &dyn SettingStore,
        requirement_id: DiscountRequirementId,
    ) -> Result<(), RepositoryError> {
        store.delete_setting(&key_for(requirement_id)).await
    }
}

fn key_for(requirement_id: DiscountRequirementId) -> String {
    defaults::settings_key(requirement_id.as_i32())
}

/// Accepts a JSON integer or a numeric string (settings written by older host versions).
fn decode_country(key: &str, value: &JsonValue) -> Result<Option<CountryId>, RepositoryError> {
    let raw = match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        JsonValue::Null => Some(0),
        _ => None,
    };

    let id = raw
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("setting {key} is not a country id: {value}"))
        })?;

    Ok(CountryId::non_zero(id))
}
