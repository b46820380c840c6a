//! Constants for the shipping country requirement rule.

/// System name stored on every requirement this rule evaluates.
pub const SYSTEM_NAME: &str = "DiscountRequirement.ShippingCountryIs";

/// Display name for admin listings.
pub const FRIENDLY_NAME: &str = "Must be shipped to country";

/// Setting key prefix; the requirement ID is appended.
pub const SETTINGS_KEY_PREFIX: &str = "DiscountRequirement.ShippingCountry-";

/// Form field prefix; the requirement ID (or 0) is appended.
pub const HTML_FIELD_PREFIX: &str = "DiscountRulesShippingCountry";

/// Route of the configuration screen, relative to the admin base URL.
pub const CONFIGURE_PATH: &str = "/plugins/discount-rules/shipping-country/configure";

/// Locale resource names.
pub mod resources {
    pub const SELECT_COUNTRY: &str = "Plugins.DiscountRules.ShippingCountry.Fields.SelectCountry";
    pub const COUNTRY: &str = "Plugins.DiscountRules.ShippingCountry.Fields.Country";
    pub const COUNTRY_HINT: &str = "Plugins.DiscountRules.ShippingCountry.Fields.Country.Hint";
    pub const DISCOUNT_ID_REQUIRED: &str =
        "Plugins.DiscountRules.ShippingCountry.Fields.DiscountId.Required";
    pub const COUNTRY_ID_REQUIRED: &str =
        "Plugins.DiscountRules.ShippingCountry.Fields.CountryId.Required";
    pub const SAVE: &str = "Plugins.DiscountRules.ShippingCountry.Save";

    /// Resources registered on install, with their default (English) values.
    pub const ALL: &[(&str, &str)] = &[
        (SELECT_COUNTRY, "Select country"),
        (COUNTRY, "Shipping country"),
        (COUNTRY_HINT, "Select required shipping country."),
        (DISCOUNT_ID_REQUIRED, "Discount is required"),
        (COUNTRY_ID_REQUIRED, "Country is required"),
        (SAVE, "Save"),
    ];
}

/// Setting key for one requirement.
#[must_use]
pub fn settings_key(requirement_id: i32) -> String {
    format!("{SETTINGS_KEY_PREFIX}{requirement_id}")
}

/// Form field prefix for one requirement, `0` while it is being created.
#[must_use]
pub fn html_field_prefix(requirement_id: i32) -> String {
    format!("{HTML_FIELD_PREFIX}{requirement_id}")
}
