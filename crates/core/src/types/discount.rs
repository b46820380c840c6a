//! Discount and discount requirement entities.
//!
//! Both are owned by the host discount subsystem; the rule only creates
//! requirement records for itself and never edits other rules' records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DiscountId, DiscountRequirementId};

/// A promotional rule that may carry zero or more requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub id: DiscountId,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

/// One configured instance of a requirement rule, attached to a discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequirement {
    pub id: DiscountRequirementId,
    pub discount_id: DiscountId,
    /// System name of the rule that evaluates this requirement.
    pub rule_system_name: String,
}

impl DiscountRequirement {
    /// Whether this requirement belongs to the given discount.
    #[must_use]
    pub fn belongs_to(&self, discount_id: DiscountId) -> bool {
        self.discount_id == discount_id
    }
}
