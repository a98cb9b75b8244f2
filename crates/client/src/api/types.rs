//! Request and response bodies for the backend REST endpoints.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use omniorder_core::{Address, Email, OrderId, OrderStatus, Price, UserId};

/// A user profile as returned by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Response of the login and registration endpoints.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(deserialize_with = "secret_string")]
    pub access_token: SecretString,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Profile submitted to the registration endpoint.
#[derive(Clone)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub mobile_number: String,
    pub password: SecretString,
    pub address: Option<Address>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("mobile_number", &self.mobile_number)
            .field("password", &"[REDACTED]")
            .field("address", &self.address)
            .finish()
    }
}

/// An order as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub item_name: String,
    pub price: Price,
    pub order_number: u64,
    #[serde(default)]
    pub item_list: Vec<String>,
    #[serde(rename = "Address")]
    pub address: Address,
    pub status: OrderStatus,
    #[serde(deserialize_with = "timestamp::required")]
    pub item_created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub item_updated_at: Option<DateTime<Utc>>,
}

/// Body of `GET /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub item_name: String,
    pub price: Price,
    pub order_number: u32,
    pub item_list: Vec<String>,
    #[serde(rename = "Address")]
    pub address: Address,
    pub status: OrderStatus,
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderMessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub order: Option<Order>,
}

/// Acknowledgement returned by the password recovery endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Paging window for `GET /orders`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

// Wire bodies borrowing secrets only for the duration of the request.

#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub mobile_number: &'a str,
    pub password: &'a str,
    pub address: Option<&'a Address>,
}

#[derive(Serialize)]
pub(crate) struct EmailBody<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct VerifyOtpBody<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ResetPasswordBody<'a> {
    pub email: &'a str,
    pub otp: &'a str,
    pub new_password: &'a str,
}

fn secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Backend timestamps are either RFC 3339 or naive UTC (`2024-05-01T10:00:00.123`).
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
    }

    pub fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_user_accepts_naive_timestamps_and_missing_address() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "65f0c2a1e4b0a1b2c3d4e5f6",
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "asha@example.com",
            "mobile_number": "9876543210",
            "status": "active",
            "created_at": "2024-05-01T10:00:00.123456",
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.full_name(), "Asha Rao");
        assert!(user.address.is_none());
        assert_eq!(
            user.created_at.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00.123456+00:00"
        );
    }

    #[test]
    fn test_auth_response_token_is_secret() {
        let response: AuthResponse = serde_json::from_value(serde_json::json!({
            "user": {
                "id": "u1",
                "first_name": "Asha",
                "last_name": "Rao",
                "email": "asha@example.com"
            },
            "access_token": "jwt-value",
            "token_type": "bearer"
        }))
        .unwrap();

        assert_eq!(response.access_token.expose_secret(), "jwt-value");
        assert!(!format!("{response:?}").contains("jwt-value"));
    }

    #[test]
    fn test_create_order_uses_capitalized_address_key() {
        let request = CreateOrderRequest {
            user_id: UserId::new("u1"),
            item_name: "Fruit basket".into(),
            price: Price::parse("250").unwrap(),
            order_number: 4821,
            item_list: vec!["Apple".into()],
            address: Address::default(),
            status: OrderStatus::Booked,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("Address").is_some());
        assert!(value.get("address").is_none());
        assert_eq!(value["status"], "BOOKED");
        assert_eq!(value["price"], 250.0);
    }

    #[test]
    fn test_register_request_debug_redacts_password() {
        let request = RegisterRequest {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: Email::parse("asha@example.com").unwrap(),
            mobile_number: "9876543210".into(),
            password: SecretString::from("hunter22"),
            address: None,
        };
        assert!(!format!("{request:?}").contains("hunter22"));
    }
}
