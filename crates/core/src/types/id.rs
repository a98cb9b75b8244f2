//! Newtype IDs for type-safe entity references.
//!
//! The backend identifies documents by opaque strings (Mongo object ids), so
//! the ids here wrap a `String` instead of an integer. Use the `define_id!`
//! macro to create wrappers that prevent mixing ids of different entities.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `new()`, `as_str()`, `Display`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use omniorder_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId);
///
/// let user_id = UserId::new("65f0c2a1e4b0a1b2c3d4e5f6");
/// let order_id = OrderId::new("65f0c2a1e4b0a1b2c3d4e5f6");
///
/// // Same text, different types:
/// // let _: UserId = order_id;
/// assert_eq!(user_id.as_str(), order_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = UserId::new("65f0c2a1e4b0a1b2c3d4e5f6");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"65f0c2a1e4b0a1b2c3d4e5f6\""
        );

        let back: OrderId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(back.as_str(), "abc123");
        assert_eq!(back.to_string(), "abc123");
    }
}
