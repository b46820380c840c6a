//! "Must be shipped to country" requirement rule.
//!
//! A customer meets the requirement when the country of their shipping
//! address equals the country configured for the requirement. Anything
//! missing along the way (customer, address, configuration, country) fails
//! closed.

pub mod configuration;
pub mod defaults;
pub mod setting;

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use discount_rules_core::{CountryId, DiscountId, DiscountRequirementId};

use super::{RequirementRule, RuleError, ValidationRequest, ValidationResult};
use crate::config::RuleOptions;
use crate::services::HostServices;

pub use configuration::{ConfigureError, SaveOutcome};
pub use setting::ShippingCountrySetting;

/// Shipping country rule bound to a set of host collaborators.
#[derive(Clone)]
pub struct ShippingCountryRule {
    services: HostServices,
    options: RuleOptions,
}

impl ShippingCountryRule {
    #[must_use]
    pub const fn new(services: HostServices, options: RuleOptions) -> Self {
        Self { services, options }
    }

    #[must_use]
    pub const fn services(&self) -> &HostServices {
        &self.services
    }

    /// Country configured for a requirement, `None` while unconfigured.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings store fails or holds a corrupt value.
    pub async fn configured_country(
        &self,
        requirement_id: DiscountRequirementId,
    ) -> Result<Option<CountryId>, RuleError> {
        let setting =
            ShippingCountrySetting::load(self.services.settings.as_ref(), requirement_id).await?;
        Ok(setting.country_id)
    }
}

/// Absolute URL of the configuration screen under the public base URL.
///
/// The base URL may carry a path prefix (the service mounted behind the host
/// admin); it is kept, with or without a trailing slash.
///
/// # Errors
///
/// Returns an error if the joined URL cannot be parsed.
pub fn configure_endpoint(base_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(defaults::CONFIGURE_PATH.trim_start_matches('/'))
}

#[async_trait]
impl RequirementRule for ShippingCountryRule {
    fn system_name(&self) -> &'static str {
        defaults::SYSTEM_NAME
    }

    fn friendly_name(&self) -> &'static str {
        defaults::FRIENDLY_NAME
    }

    #[instrument(
        skip(self, request),
        fields(requirement_id = ?request.discount_requirement_id)
    )]
    async fn check_requirement(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResult, RuleError> {
        let Some(customer) = &request.customer else {
            return Ok(ValidationResult::invalid());
        };

        let Some(address_id) = customer.shipping_address_id else {
            return Ok(ValidationResult::invalid());
        };
        let Some(address) = self.services.addresses.get_address_by_id(address_id).await? else {
            tracing::debug!(%address_id, "Shipping address not found");
            return Ok(ValidationResult::invalid());
        };

        let Some(requirement_id) = request.discount_requirement_id else {
            return Ok(ValidationResult::invalid());
        };
        let Some(configured) = self.configured_country(requirement_id).await? else {
            tracing::debug!("Requirement has no configured country");
            return Ok(ValidationResult::invalid());
        };

        let Some(shipping_country) = address.country_id else {
            return Ok(ValidationResult::invalid());
        };

        if self.options.verify_country
            && self
                .services
                .countries
                .get_country_by_id(shipping_country)
                .await?
                .is_none()
        {
            tracing::warn!(country_id = %shipping_country, "Shipping address has unknown country");
            return Ok(ValidationResult::invalid());
        }

        Ok(ValidationResult::valid_if(shipping_country == configured))
    }

    fn configuration_url(
        &self,
        base_url: &Url,
        discount_id: DiscountId,
        requirement_id: Option<DiscountRequirementId>,
    ) -> Result<Url, RuleError> {
        let mut url = configure_endpoint(base_url)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("discountId", &discount_id.to_string());
            if let Some(requirement_id) = requirement_id {
                query.append_pair("discountRequirementId", &requirement_id.to_string());
            }
        }
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn install(&self) -> Result<(), RuleError> {
        for (name, value) in defaults::resources::ALL {
            self.services
                .locales
                .add_or_update_resource(name, value)
                .await?;
        }
        tracing::info!(
            resources = defaults::resources::ALL.len(),
            "Installed shipping country rule"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn uninstall(&self) -> Result<(), RuleError> {
        let requirements = self
            .services
            .discounts
            .get_all_requirements(Some(defaults::SYSTEM_NAME))
            .await?;

        for requirement in &requirements {
            ShippingCountrySetting::delete(self.services.settings.as_ref(), requirement.id)
                .await?;
            self.services
                .discounts
                .delete_requirement(requirement.id)
                .await?;
        }

        for (name, _) in defaults::resources::ALL {
            self.services.locales.delete_resource(name).await?;
        }

        tracing::info!(
            requirements = requirements.len(),
            "Uninstalled shipping country rule"
        );
        Ok(())
    }
}
