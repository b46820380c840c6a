//! Ad-hoc requirement evaluation.
//!
//! Builds a customer shipping to the given address and runs the requirement
//! through the rule registry, exactly as the discount engine would.
//!
//! # Usage
//!
//! ```bash
//! dr-cli evaluate --requirement 7 --address 100
//! ```
//!
//! # Environment Variables
//!
//! - `DISCOUNT_RULES_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `RULE_VERIFY_COUNTRY` - Also look up the shipping country in the directory

use discount_rules_core::{AddressId, Customer, CustomerId, DiscountRequirementId};

use discount_rules_admin::{
    config,
    rules::{RuleRegistry, ShippingCountryRule, ValidationRequest},
    services::HostServices,
};

use super::{CommandError, connect};

/// Evaluate a requirement and log the outcome.
pub async fn run(requirement: i32, address: Option<i32>) -> Result<(), CommandError> {
    let requirement_id = DiscountRequirementId::non_zero(requirement).ok_or_else(|| {
        CommandError::InvalidArgument(format!("requirement must be positive, got {requirement}"))
    })?;

    let options = config::rule_options_from_env()?;
    let pool = connect().await?;
    let services = HostServices::postgres(&pool);

    let mut registry = RuleRegistry::new();
    registry.register(std::sync::Arc::new(ShippingCountryRule::new(
        services.clone(),
        options,
    )));

    // Ad-hoc customer; only the shipping address matters to the rule
    let customer = Customer::new(CustomerId::new(0));
    let customer = match address.and_then(AddressId::non_zero) {
        Some(address_id) => customer.with_shipping_address(address_id),
        None => customer,
    };

    let request = ValidationRequest {
        discount_requirement_id: Some(requirement_id),
        customer: Some(customer),
    };

    let result = registry
        .evaluate(services.discounts.as_ref(), Some(&request))
        .await?;

    tracing::info!(
        %requirement_id,
        address = ?address,
        is_valid = result.is_valid,
        "Requirement evaluated"
    );
    Ok(())
}
