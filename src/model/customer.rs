use serde::{Deserialize, Serialize};

/// A postal address as captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub fullname: String,
    pub email: String,
    pub contact: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    /// Field-by-field comparison ignoring case and surrounding whitespace.
    pub fn matches(&self, other: &Address) -> bool {
        let same = |a: &str, b: &str| a.trim().to_lowercase() == b.trim().to_lowercase();
        same(&self.fullname, &other.fullname)
            && same(&self.email, &other.email)
            && same(&self.contact, &other.contact)
            && same(&self.street, &other.street)
            && same(&self.city, &other.city)
            && same(&self.state, &other.state)
            && same(&self.zip, &other.zip)
            && same(&self.country, &other.country)
    }
}

/// A customer profile: address book plus the ids of the orders they placed.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](collection_actor::ActorEntity) trait and
/// is keyed by the identity provider's user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub uid: String,
    pub email: String,
    pub addresses: Vec<Address>,
    pub order_ids: Vec<String>,
}

/// Payload for creating a customer profile.
#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub uid: String,
    pub email: String,
}

/// Payload for updating a customer profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            fullname: "Asha Rao".into(),
            email: "asha@example.com".into(),
            contact: "9800000000".into(),
            street: "12 MG Road".into(),
            city: "Pune".into(),
            state: "MH".into(),
            zip: "411001".into(),
            country: "India".into(),
        }
    }

    #[test]
    fn test_match_ignores_case_and_padding() {
        let mut other = address();
        other.city = " PUNE".into();
        other.street = "12 mg road".into();
        assert!(address().matches(&other));
    }

    #[test]
    fn test_any_field_difference_is_a_new_address() {
        let mut other = address();
        other.zip = "411002".into();
        assert!(!address().matches(&other));
    }
}
