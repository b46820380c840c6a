//! Rule lifecycle commands.
//!
//! # Usage
//!
//! ```bash
//! dr-cli plugin install
//! dr-cli plugin uninstall
//! ```

use discount_rules_admin::{
    config::RuleOptions,
    rules::{RequirementRule, ShippingCountryRule},
    services::HostServices,
};

use super::{CommandError, connect};

async fn rule() -> Result<ShippingCountryRule, CommandError> {
    let pool = connect().await?;
    Ok(ShippingCountryRule::new(
        HostServices::postgres(&pool),
        RuleOptions::default(),
    ))
}

/// Register the rule's locale resources.
pub async fn install() -> Result<(), CommandError> {
    let rule = rule().await?;
    rule.install().await?;

    tracing::info!("Installed {}", rule.friendly_name());
    Ok(())
}

/// Remove the rule's requirements, their settings and its locale resources.
pub async fn uninstall() -> Result<(), CommandError> {
    let rule = rule().await?;
    rule.uninstall().await?;

    tracing::info!("Uninstalled {}", rule.friendly_name());
    Ok(())
}
