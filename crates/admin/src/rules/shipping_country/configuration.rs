//! Configuration screen logic: building the form model and saving it.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use discount_rules_core::{CountryId, DiscountId, DiscountRequirement, DiscountRequirementId};

use super::defaults::{self, resources};
use super::{ShippingCountryRule, ShippingCountrySetting};
use crate::db::RepositoryError;
use crate::models::{RequirementForm, RequirementModel, SelectListItem};

/// Errors from the configuration screen.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("Discount could not be loaded")]
    DiscountNotFound,

    #[error("Failed to load requirement.")]
    RequirementNotFound,

    /// One localized message per failing field.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub requirement_id: DiscountRequirementId,
    /// Whether the save created the requirement.
    pub created: bool,
}

impl ShippingCountryRule {
    /// Localized text for a resource, falling back to the built-in English value.
    ///
    /// # Errors
    ///
    /// Returns an error if the locale store fails.
    pub async fn text(&self, name: &str) -> Result<String, RepositoryError> {
        if let Some(value) = self.services().locales.get_resource(name).await? {
            return Ok(value);
        }
        Ok(resources::ALL
            .iter()
            .find(|(key, _)| *key == name)
            .map_or_else(|| name.to_string(), |(_, value)| (*value).to_string()))
    }

    /// Build the form model for a discount and, when editing, one of its requirements.
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError::DiscountNotFound` if the discount does not exist and
    /// `ConfigureError::RequirementNotFound` if the requirement does not exist,
    /// belongs to another discount or is evaluated by another rule.
    #[instrument(skip(self))]
    pub async fn configuration(
        &self,
        discount_id: DiscountId,
        requirement_id: Option<DiscountRequirementId>,
    ) -> Result<RequirementModel, ConfigureError> {
        let services = self.services();

        let discount = services
            .discounts
            .get_discount_by_id(discount_id)
            .await?
            .ok_or(ConfigureError::DiscountNotFound)?;

        let requirement = match requirement_id {
            Some(id) => Some(
                services
                    .discounts
                    .get_requirement_by_id(id)
                    .await?
                    .filter(|r| {
                        r.belongs_to(discount.id) && r.rule_system_name == defaults::SYSTEM_NAME
                    })
                    .ok_or(ConfigureError::RequirementNotFound)?,
            ),
            None => None,
        };

        let configured = match &requirement {
            Some(requirement) => {
                ShippingCountrySetting::load(services.settings.as_ref(), requirement.id)
                    .await?
                    .country_id
            }
            None => None,
        };

        let mut available_countries = vec![SelectListItem::new(
            self.text(resources::SELECT_COUNTRY).await?,
            "0",
        )];
        available_countries.extend(
            services
                .countries
                .get_all_countries()
                .await?
                .into_iter()
                .map(|country| {
                    let selected = requirement.is_some() && configured == Some(country.id);
                    SelectListItem::new(country.name, country.id.to_string()).selected(selected)
                }),
        );

        let requirement_id = requirement.as_ref().map_or(0, |r| r.id.as_i32());

        Ok(RequirementModel {
            discount_id: discount.id.as_i32(),
            requirement_id,
            country_id: configured.map_or(0, |id| id.as_i32()),
            available_countries,
            html_field_prefix: defaults::html_field_prefix(requirement_id),
        })
    }

    /// Check a submitted form, returning one localized message per failing field.
    ///
    /// # Errors
    ///
    /// Returns an error if the locale store fails.
    pub async fn validate(&self, form: &RequirementForm) -> Result<Vec<String>, RepositoryError> {
        let mut errors = Vec::new();
        if DiscountId::non_zero(form.discount_id).is_none() {
            errors.push(self.text(resources::DISCOUNT_ID_REQUIRED).await?);
        }
        if CountryId::non_zero(form.country_id).is_none() {
            errors.push(self.text(resources::COUNTRY_ID_REQUIRED).await?);
        }
        Ok(errors)
    }

    /// Save the configured country, creating the requirement on first save.
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError::Validation` if the form is invalid (nothing is
    /// written), `ConfigureError::DiscountNotFound` if the discount does not
    /// exist, or a repository error.
    #[instrument(
        skip(self, form),
        fields(
            discount_id = form.discount_id,
            requirement_id = ?form.discount_requirement_id,
            country_id = form.country_id,
        )
    )]
    pub async fn save_configuration(
        &self,
        form: &RequirementForm,
    ) -> Result<SaveOutcome, ConfigureError> {
        let errors = self.validate(form).await?;
        let (Some(discount_id), Some(country_id), true) = (
            DiscountId::non_zero(form.discount_id),
            CountryId::non_zero(form.country_id),
            errors.is_empty(),
        ) else {
            return Err(ConfigureError::Validation(errors));
        };

        let services = self.services();
        let mut discount = services
            .discounts
            .get_discount_by_id(discount_id)
            .await?
            .ok_or(ConfigureError::DiscountNotFound)?;

        let existing = self
            .reusable_requirement(discount_id, form.discount_requirement_id)
            .await?;

        let (requirement_id, created) = if let Some(requirement) = existing {
            (requirement.id, false)
        } else {
            // Must precede the insert: a failed update leaves nothing behind
            discount.updated_at = Utc::now();
            services
                .discounts
                .update_discount(&discount)
                .await
                .map_err(discount_gone)?;

            let requirement = services
                .discounts
                .insert_requirement(discount_id, defaults::SYSTEM_NAME)
                .await
                .map_err(discount_gone)?;

            tracing::info!(requirement_id = %requirement.id, "Created shipping country requirement");
            (requirement.id, true)
        };

        let saved = ShippingCountrySetting::new(requirement_id, Some(country_id))
            .save(services.settings.as_ref())
            .await;
        if let Err(err) = saved {
            if created {
                self.discard_requirement(requirement_id).await;
            }
            return Err(err.into());
        }

        tracing::info!(%requirement_id, %country_id, "Saved shipping country");
        Ok(SaveOutcome {
            requirement_id,
            created,
        })
    }

    /// Remove a requirement created by a save whose setting could not be written.
    async fn discard_requirement(&self, requirement_id: DiscountRequirementId) {
        if let Err(e) = self
            .services()
            .discounts
            .delete_requirement(requirement_id)
            .await
        {
            tracing::error!(%requirement_id, error = %e, "Failed to remove unconfigured requirement");
        }
    }

    /// The submitted requirement, if it exists, belongs to the discount and is evaluated by this rule.
    async fn reusable_requirement(
        &self,
        discount_id: DiscountId,
        requirement_id: Option<i32>,
    ) -> Result<Option<DiscountRequirement>, RepositoryError> {
        let Some(requirement_id) = requirement_id.and_then(DiscountRequirementId::non_zero) else {
            return Ok(None);
        };

        let requirement = self
            .services()
            .discounts
            .get_requirement_by_id(requirement_id)
            .await?;

        Ok(requirement
            .filter(|r| r.belongs_to(discount_id) && r.rule_system_name == defaults::SYSTEM_NAME))
    }
}

/// The discount disappeared between loading it and attaching the requirement.
fn discount_gone(err: RepositoryError) -> ConfigureError {
    match err {
        RepositoryError::NotFound | RepositoryError::Conflict(_) => ConfigureError::DiscountNotFound,
        other => ConfigureError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::Value as JsonValue;

    use discount_rules_core::Discount;

    use super::*;
    use crate::config::RuleOptions;
    use crate::services::{DiscountStore, HostServices, LocaleStore, MemoryHost, SettingStore};

    /// Memory host whose discount updates and setting writes fail.
    struct FailingWrites(Arc<MemoryHost>);

    fn write_failed() -> RepositoryError {
        RepositoryError::DataCorruption("write failed".to_string())
    }

    #[async_trait]
    impl DiscountStore for FailingWrites {
        async fn get_discount_by_id(
            &self,
            id: DiscountId,
        ) -> Result<Option<Discount>, RepositoryError> {
            self.0.get_discount_by_id(id).await
        }

        async fn update_discount(&self, _discount: &Discount) -> Result<(), RepositoryError> {
            Err(write_failed())
        }

        async fn get_requirement_by_id(
            &self,
            id: DiscountRequirementId,
        ) -> Result<Option<DiscountRequirement>, RepositoryError> {
            self.0.get_requirement_by_id(id).await
        }

        async fn insert_requirement(
            &self,
            discount_id: DiscountId,
            rule_system_name: &str,
        ) -> Result<DiscountRequirement, RepositoryError> {
            self.0.insert_requirement(discount_id, rule_system_name).await
        }

        async fn delete_requirement(&self, id: DiscountRequirementId) -> Result<(), RepositoryError> {
            self.0.delete_requirement(id).await
        }

        async fn get_all_requirements(
            &self,
            rule_system_name: Option<&str>,
        ) -> Result<Vec<DiscountRequirement>, RepositoryError> {
            self.0.get_all_requirements(rule_system_name).await
        }
    }

    #[async_trait]
    impl SettingStore for FailingWrites {
        async fn get_setting(&self, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
            self.0.get_setting(key).await
        }

        async fn set_setting(&self, _key: &str, _value: &JsonValue) -> Result<(), RepositoryError> {
            Err(write_failed())
        }

        async fn delete_setting(&self, key: &str) -> Result<(), RepositoryError> {
            self.0.delete_setting(key).await
        }
    }

    async fn host() -> Arc<MemoryHost> {
        let host = Arc::new(MemoryHost::new());
        host.add_discount(5, "Summer").await;
        host.add_country(10, "Germany", "DE").await;
        host.add_country(11, "France", "FR").await;
        host
    }

    fn rule(host: &Arc<MemoryHost>) -> ShippingCountryRule {
        ShippingCountryRule::new(HostServices::in_memory(host.clone()), RuleOptions::default())
    }

    fn form(discount_id: i32, requirement_id: Option<i32>, country_id: i32) -> RequirementForm {
        RequirementForm {
            discount_id,
            discount_requirement_id: requirement_id,
            country_id,
        }
    }

    #[tokio::test]
    async fn test_new_requirement_model_has_placeholder_first() {
        let host = host().await;
        let model = rule(&host)
            .configuration(DiscountId::new(5), None)
            .await
            .unwrap();

        assert_eq!(model.requirement_id, 0);
        assert_eq!(model.country_id, 0);
        assert_eq!(model.html_field_prefix, "DiscountRulesShippingCountry0");
        let texts: Vec<_> = model
            .available_countries
            .iter()
            .map(|i| i.text.as_str())
            .collect();
        assert_eq!(texts, ["Select country", "France", "Germany"]);
        assert_eq!(model.available_countries[0].value, "0");
        assert!(model.available_countries.iter().all(|i| !i.selected));
    }

    #[tokio::test]
    async fn test_placeholder_uses_installed_resource() {
        let host = host().await;
        host.add_or_update_resource(resources::SELECT_COUNTRY, "Land wählen")
            .await
            .unwrap();

        let model = rule(&host)
            .configuration(DiscountId::new(5), None)
            .await
            .unwrap();
        assert_eq!(model.available_countries[0].text, "Land wählen");
    }

    #[tokio::test]
    async fn test_existing_requirement_marks_configured_country() {
        let host = host().await;
        host.add_requirement(7, 5, defaults::SYSTEM_NAME).await;
        let rule = rule(&host);
        rule.save_configuration(&form(5, Some(7), 11)).await.unwrap();

        let model = rule
            .configuration(DiscountId::new(5), Some(DiscountRequirementId::new(7)))
            .await
            .unwrap();

        assert_eq!(model.country_id, 11);
        assert_eq!(model.html_field_prefix, "DiscountRulesShippingCountry7");
        let selected: Vec<_> = model
            .available_countries
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.value.as_str())
            .collect();
        assert_eq!(selected, ["11"]);
    }

    #[tokio::test]
    async fn test_configuration_for_missing_discount() {
        let host = host().await;
        let result = rule(&host).configuration(DiscountId::new(999), None).await;
        assert!(matches!(result, Err(ConfigureError::DiscountNotFound)));
    }

    #[tokio::test]
    async fn test_configuration_for_foreign_requirement() {
        let host = host().await;
        host.add_discount(6, "Winter").await;
        host.add_requirement(7, 6, defaults::SYSTEM_NAME).await;

        let result = rule(&host)
            .configuration(DiscountId::new(5), Some(DiscountRequirementId::new(7)))
            .await;
        assert!(matches!(result, Err(ConfigureError::RequirementNotFound)));
    }

    #[tokio::test]
    async fn test_first_save_creates_requirement() {
        let host = host().await;
        let before = host.discount(5).await.unwrap().updated_at;

        let outcome = rule(&host)
            .save_configuration(&form(5, Some(0), 10))
            .await
            .unwrap();

        assert!(outcome.created);
        let requirements = host.requirements().await;
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].id, outcome.requirement_id);
        assert_eq!(requirements[0].rule_system_name, defaults::SYSTEM_NAME);
        assert_eq!(
            host.setting(&defaults::settings_key(outcome.requirement_id.as_i32()))
                .await,
            Some(serde_json::json!(10))
        );
        assert!(host.discount(5).await.unwrap().updated_at >= before);
    }

    #[tokio::test]
    async fn test_second_save_reuses_requirement() {
        let host = host().await;
        let rule = rule(&host);

        let first = rule.save_configuration(&form(5, None, 10)).await.unwrap();
        let second = rule
            .save_configuration(&form(5, Some(first.requirement_id.as_i32()), 11))
            .await
            .unwrap();

        assert!(!second.created);
        assert_eq!(first.requirement_id, second.requirement_id);
        assert_eq!(host.requirements().await.len(), 1);
        assert_eq!(
            rule.configured_country(first.requirement_id).await.unwrap(),
            Some(CountryId::new(11))
        );
    }

    #[tokio::test]
    async fn test_save_with_other_rules_requirement_creates_new_one() {
        let host = host().await;
        host.add_requirement(7, 5, "DiscountRequirement.Other").await;

        let outcome = rule(&host)
            .save_configuration(&form(5, Some(7), 10))
            .await
            .unwrap();

        assert!(outcome.created);
        assert_ne!(outcome.requirement_id, DiscountRequirementId::new(7));
        assert_eq!(host.requirements().await.len(), 2);
    }

    #[tokio::test]
    async fn test_configuration_for_other_rules_requirement() {
        let host = host().await;
        host.add_requirement(8, 5, "DiscountRequirement.HasOneProduct").await;

        let result = rule(&host)
            .configuration(DiscountId::new(5), Some(DiscountRequirementId::new(8)))
            .await;
        assert!(matches!(result, Err(ConfigureError::RequirementNotFound)));
    }

    #[tokio::test]
    async fn test_failed_discount_update_creates_no_requirement() {
        let host = host().await;
        let services = HostServices {
            discounts: Arc::new(FailingWrites(host.clone())),
            ..HostServices::in_memory(host.clone())
        };
        let rule = ShippingCountryRule::new(services, RuleOptions::default());

        let result = rule.save_configuration(&form(5, None, 10)).await;

        assert!(matches!(result, Err(ConfigureError::Repository(_))));
        assert!(host.requirements().await.is_empty());
        assert_eq!(host.setting_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_setting_write_removes_new_requirement() {
        let host = host().await;
        let services = HostServices {
            settings: Arc::new(FailingWrites(host.clone())),
            ..HostServices::in_memory(host.clone())
        };
        let rule = ShippingCountryRule::new(services, RuleOptions::default());

        let result = rule.save_configuration(&form(5, None, 10)).await;

        assert!(matches!(result, Err(ConfigureError::Repository(_))));
        assert!(host.requirements().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_setting_write_keeps_existing_requirement() {
        let host = host().await;
        host.add_requirement(7, 5, defaults::SYSTEM_NAME).await;
        let services = HostServices {
            settings: Arc::new(FailingWrites(host.clone())),
            ..HostServices::in_memory(host.clone())
        };
        let rule = ShippingCountryRule::new(services, RuleOptions::default());

        let result = rule.save_configuration(&form(5, Some(7), 10)).await;

        assert!(matches!(result, Err(ConfigureError::Repository(_))));
        assert_eq!(host.requirements().await.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_collects_every_error() {
        let host = host().await;
        let result = rule(&host).save_configuration(&form(0, None, 0)).await;

        match result {
            Err(ConfigureError::Validation(errors)) => {
                assert_eq!(errors, ["Discount is required", "Country is required"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(host.requirements().await.is_empty());
        assert_eq!(host.setting_count().await, 0);
    }

    #[tokio::test]
    async fn test_save_for_missing_discount_changes_nothing() {
        let host = host().await;
        let result = rule(&host).save_configuration(&form(999, None, 10)).await;

        assert!(matches!(result, Err(ConfigureError::DiscountNotFound)));
        assert!(host.requirements().await.is_empty());
        assert_eq!(host.setting_count().await, 0);
    }
}
