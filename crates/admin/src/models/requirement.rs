//! View and form models for the shipping country configuration screen.

use serde::{Deserialize, Deserializer, Serialize, de};

/// One option of a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectListItem {
    pub text: String,
    pub value: String,
    pub selected: bool,
}

impl SelectListItem {
    #[must_use]
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
            selected: false,
        }
    }

    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// State of the configuration form for one requirement.
///
/// IDs are kept as raw host integers because the form round-trips them:
/// `requirement_id` is `0` while the requirement is being created and
/// `country_id` is `0` while nothing is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementModel {
    pub discount_id: i32,
    pub requirement_id: i32,
    pub country_id: i32,
    /// Placeholder first, then every country in directory order.
    pub available_countries: Vec<SelectListItem>,
    /// Prefix for element IDs so several forms can share a page.
    pub html_field_prefix: String,
}

/// Submitted configuration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementForm {
    #[serde(default)]
    pub discount_id: i32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub discount_requirement_id: Option<i32>,
    #[serde(default)]
    pub country_id: i32,
}

/// Forms post an empty hidden input for a requirement that does not exist yet.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i32),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid requirement id: {text}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults_missing_fields_to_zero() {
        let form: RequirementForm = serde_json::from_str(r#"{"countryId": 10}"#).unwrap();
        assert_eq!(form.discount_id, 0);
        assert_eq!(form.discount_requirement_id, None);
        assert_eq!(form.country_id, 10);
    }

    #[test]
    fn test_form_treats_blank_requirement_id_as_absent() {
        let form: RequirementForm = serde_json::from_str(
            r#"{"discountId": 5, "discountRequirementId": "", "countryId": 10}"#,
        )
        .unwrap();
        assert_eq!(form.discount_requirement_id, None);

        let form: RequirementForm =
            serde_json::from_str(r#"{"discountRequirementId": null}"#).unwrap();
        assert_eq!(form.discount_requirement_id, None);
    }

    #[test]
    fn test_form_accepts_numeric_requirement_id() {
        let form: RequirementForm =
            serde_json::from_str(r#"{"discountRequirementId": 7}"#).unwrap();
        assert_eq!(form.discount_requirement_id, Some(7));

        let form: RequirementForm =
            serde_json::from_str(r#"{"discountRequirementId": " 7 "}"#).unwrap();
        assert_eq!(form.discount_requirement_id, Some(7));

        assert!(serde_json::from_str::<RequirementForm>(r#"{"discountRequirementId": "x"}"#).is_err());
    }

    #[test]
    fn test_model_serializes_camel_case() {
        let model = RequirementModel {
            discount_id: 5,
            requirement_id: 0,
            country_id: 0,
            available_countries: vec![SelectListItem::new("Select country", "0")],
            html_field_prefix: "DiscountRulesShippingCountry0".to_string(),
        };

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["discountId"], 5);
        assert_eq!(json["availableCountries"][0]["value"], "0");
    }
}
