//! Registry of requirement rules keyed by system name.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use super::{RequirementRule, RuleError, ValidationRequest, ValidationResult};
use crate::services::DiscountStore;

/// Maps rule system names to rule implementations.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<&'static str, Arc<dyn RequirementRule>>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, replacing any rule with the same system name.
    pub fn register(&mut self, rule: Arc<dyn RequirementRule>) {
        self.rules.insert(rule.system_name(), rule);
    }

    #[must_use]
    pub fn get(&self, system_name: &str) -> Option<&Arc<dyn RequirementRule>> {
        self.rules.get(system_name)
    }

    /// Registered rules in system name order.
    pub fn rules(&self) -> impl Iterator<Item = &Arc<dyn RequirementRule>> {
        self.rules.values()
    }

    /// Evaluate a request on behalf of the discount engine.
    ///
    /// Looks up the requirement to find which rule evaluates it. A missing
    /// request is an invalid argument; a request without a requirement, or
    /// for a requirement that no longer exists, fails closed.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidArgument` if `request` is `None`,
    /// `RuleError::UnknownRule` if the requirement's rule is not registered,
    /// or the rule's own error.
    #[instrument(skip(self, discounts, request))]
    pub async fn evaluate(
        &self,
        discounts: &dyn DiscountStore,
        request: Option<&ValidationRequest>,
    ) -> Result<ValidationResult, RuleError> {
        let request = request
            .ok_or_else(|| RuleError::InvalidArgument("validation request is required".into()))?;

        let Some(requirement_id) = request.discount_requirement_id else {
            return Ok(ValidationResult::invalid());
        };

        let Some(requirement) = discounts.get_requirement_by_id(requirement_id).await? else {
            tracing::warn!(%requirement_id, "Evaluated requirement does not exist");
            return Ok(ValidationResult::invalid());
        };

        let rule = self
            .get(&requirement.rule_system_name)
            .ok_or_else(|| RuleError::UnknownRule(requirement.rule_system_name.clone()))?;

        rule.check_requirement(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use discount_rules_core::{DiscountId, DiscountRequirementId};
    use url::Url;

    use super::*;
    use crate::services::MemoryHost;

    /// A rule that accepts every request.
    struct AlwaysValid;

    #[async_trait::async_trait]
    impl RequirementRule for AlwaysValid {
        fn system_name(&self) -> &'static str {
            "Test.AlwaysValid"
        }

        fn friendly_name(&self) -> &'static str {
            "Always valid"
        }

        async fn check_requirement(
            &self,
            _request: &ValidationRequest,
        ) -> Result<ValidationResult, RuleError> {
            Ok(ValidationResult::valid_if(true))
        }

        fn configuration_url(
            &self,
            base_url: &Url,
            _discount_id: DiscountId,
            _requirement_id: Option<DiscountRequirementId>,
        ) -> Result<Url, RuleError> {
            Ok(base_url.clone())
        }

        async fn install(&self) -> Result<(), RuleError> {
            Ok(())
        }

        async fn uninstall(&self) -> Result<(), RuleError> {
            Ok(())
        }
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(AlwaysValid));
        registry
    }

    fn request_for(id: i32) -> ValidationRequest {
        ValidationRequest {
            discount_requirement_id: Some(DiscountRequirementId::new(id)),
            customer: None,
        }
    }

    #[tokio::test]
    async fn test_missing_request_is_invalid_argument() {
        let host = MemoryHost::new();
        let result = registry().evaluate(&host, None).await;
        assert!(matches!(result, Err(RuleError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_missing_requirement_id_fails_closed() {
        let host = MemoryHost::new();
        let result = registry()
            .evaluate(&host, Some(&ValidationRequest::default()))
            .await
            .unwrap();
        assert!(!result.is_valid);
    }

    #[tokio::test]
    async fn test_unknown_requirement_fails_closed() {
        let host = MemoryHost::new();
        let result = registry()
            .evaluate(&host, Some(&request_for(42)))
            .await
            .unwrap();
        assert!(!result.is_valid);
    }

    #[tokio::test]
    async fn test_dispatches_on_rule_system_name() {
        let host = MemoryHost::new();
        host.add_requirement(1, 5, "Test.AlwaysValid").await;

        let result = registry()
            .evaluate(&host, Some(&request_for(1)))
            .await
            .unwrap();
        assert!(result.is_valid);
    }

    #[tokio::test]
    async fn test_unregistered_rule_is_an_error() {
        let host = MemoryHost::new();
        host.add_requirement(1, 5, "Test.Unknown").await;

        let result = registry().evaluate(&host, Some(&request_for(1))).await;
        assert!(matches!(result, Err(RuleError::UnknownRule(name)) if name == "Test.Unknown"));
    }
}
