//! Discount requirement rules.
//!
//! A rule decides whether a customer meets one configured requirement of a
//! discount. The host discount engine calls rules through the
//! [`RuleRegistry`], keyed by the rule's system name.
//!
//! # Rules
//!
//! - [`ShippingCountryRule`] - customer's shipping country must equal a configured country

pub mod registry;
pub mod shipping_country;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use discount_rules_core::{Customer, DiscountId, DiscountRequirementId};

use crate::db::RepositoryError;

pub use registry::RuleRegistry;
pub use shipping_country::ShippingCountryRule;

/// Everything a rule needs to check one requirement for one customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    /// Requirement being checked. A request without one never validates.
    #[serde(default)]
    pub discount_requirement_id: Option<DiscountRequirementId>,
    /// Customer at checkout, absent for anonymous evaluations.
    #[serde(default)]
    pub customer: Option<Customer>,
}

/// Outcome of a requirement check. Invalid by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
}

impl ValidationResult {
    /// The "does not meet the requirement" outcome.
    #[must_use]
    pub const fn invalid() -> Self {
        Self { is_valid: false }
    }

    #[must_use]
    pub const fn valid_if(condition: bool) -> Self {
        Self {
            is_valid: condition,
        }
    }
}

/// Errors raised while evaluating or managing rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A collaborator store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The caller passed no request at all.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A requirement names a rule that is not registered.
    #[error("no requirement rule registered as '{0}'")]
    UnknownRule(String),

    /// Building a URL from the configured base URL failed.
    #[error("invalid configuration URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A discount requirement rule.
#[async_trait]
pub trait RequirementRule: Send + Sync {
    /// Stable identifier stored on each requirement this rule evaluates.
    fn system_name(&self) -> &'static str;

    /// Human-readable rule name for admin listings.
    fn friendly_name(&self) -> &'static str;

    /// Check whether the request's customer meets the requirement.
    async fn check_requirement(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResult, RuleError>;

    /// Absolute URL of the rule's configuration screen.
    fn configuration_url(
        &self,
        base_url: &Url,
        discount_id: DiscountId,
        requirement_id: Option<DiscountRequirementId>,
    ) -> Result<Url, RuleError>;

    /// Register the rule's resources with the host.
    async fn install(&self) -> Result<(), RuleError>;

    /// Remove the rule's requirements, settings and resources from the host.
    async fn uninstall(&self) -> Result<(), RuleError>;
}
