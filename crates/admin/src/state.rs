//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use url::Url;

use crate::config::{RuleOptions, RuleServiceConfig};
use crate::rules::{RuleRegistry, ShippingCountryRule};
use crate::services::HostServices;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    base_url: Url,
    services: HostServices,
    registry: RuleRegistry,
    shipping_country: Arc<ShippingCountryRule>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Build state over the given collaborators and register the rules.
    #[must_use]
    pub fn new(base_url: Url, services: HostServices, options: RuleOptions) -> Self {
        Self::build(base_url, services, options, None)
    }

    /// Build state backed by the `PostgreSQL` repositories.
    #[must_use]
    pub fn postgres(config: &RuleServiceConfig, pool: PgPool) -> Self {
        let services = HostServices::postgres(&pool);
        Self::build(config.base_url.clone(), services, config.rules, Some(pool))
    }

    fn build(
        base_url: Url,
        services: HostServices,
        options: RuleOptions,
        pool: Option<PgPool>,
    ) -> Self {
        let shipping_country = Arc::new(ShippingCountryRule::new(services.clone(), options));

        let mut registry = RuleRegistry::new();
        registry.register(shipping_country.clone());

        Self {
            inner: Arc::new(AppStateInner {
                base_url,
                services,
                registry,
                shipping_country,
                pool,
            }),
        }
    }

    /// Public base URL used to build configuration links.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn services(&self) -> &HostServices {
        &self.inner.services
    }

    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn shipping_country(&self) -> &ShippingCountryRule {
        &self.inner.shipping_country
    }

    /// Database pool, absent when running on in-memory collaborators.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
