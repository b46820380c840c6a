//! Read-only reference entities: countries, addresses and customers.

use serde::{Deserialize, Serialize};

use super::id::{AddressId, CountryId, CustomerId};

/// A country from the host directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub two_letter_iso_code: String,
    pub display_order: i32,
    pub published: bool,
}

/// A postal address. The country is optional on the host side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub country_id: Option<CountryId>,
}

/// The shopper being evaluated at checkout.
///
/// Only the shipping address reference matters to requirement rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default)]
    pub shipping_address_id: Option<AddressId>,
}

impl Customer {
    /// A customer with no shipping address assigned.
    #[must_use]
    pub const fn new(id: CustomerId) -> Self {
        Self {
            id,
            shipping_address_id: None,
        }
    }

    /// Assign the shipping address reference.
    #[must_use]
    pub fn with_shipping_address(mut self, address_id: AddressId) -> Self {
        self.shipping_address_id = Some(address_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_deserializes_without_shipping_address() {
        let customer: Customer = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(customer.id, CustomerId::new(3));
        assert_eq!(customer.shipping_address_id, None);
    }

    #[test]
    fn test_customer_deserializes_camel_case() {
        let customer: Customer =
            serde_json::from_str(r#"{"id": 3, "shippingAddressId": 12}"#).unwrap();
        assert_eq!(customer.shipping_address_id, Some(AddressId::new(12)));
    }
}
