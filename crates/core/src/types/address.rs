//! Postal address shared by user profiles and order shipping.

use serde::{Deserialize, Serialize};

/// Country used when neither the user nor the form supplies one.
pub const DEFAULT_COUNTRY: &str = "India";

/// A postal address.
///
/// Fields missing from a backend payload deserialize as empty strings, except
/// `country` which falls back to [`DEFAULT_COUNTRY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_owned()
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: default_country(),
        }
    }
}

impl Address {
    /// Single-line rendering, skipping blank parts.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            self.street_address.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.postal_code.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_country() {
        assert_eq!(Address::default().country, "India");
        let partial: Address = serde_json::from_str(r#"{"city":"Pune"}"#).unwrap();
        assert_eq!(partial.country, "India");
        assert_eq!(partial.street_address, "");
    }

    #[test]
    fn test_one_line_skips_blank_parts() {
        let address = Address {
            street_address: "12 MG Road".into(),
            city: "Pune".into(),
            state: String::new(),
            postal_code: "411001".into(),
            country: "India".into(),
        };
        assert_eq!(address.one_line(), "12 MG Road, Pune, 411001, India");
    }
}
