//! One-time password used by the password recovery flow.

use secrecy::{ExposeSecret, SecretString};

/// A one-time code as typed by the user.
///
/// The backend issues codes of exactly [`Otp::LENGTH`] characters. Input is
/// truncated to that length the way a `maxlength` form field would; shorter
/// codes are passed through and left for the backend to reject.
#[derive(Clone)]
pub struct Otp(SecretString);

impl Otp {
    /// Number of characters in a backend-issued code.
    pub const LENGTH: usize = 4;

    /// Build a code from raw input, keeping at most [`Otp::LENGTH`] characters.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        let code: String = input.trim().chars().take(Self::LENGTH).collect();
        Self(SecretString::from(code))
    }

    /// The code text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether no code has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Default for Otp {
    fn default() -> Self {
        Self(SecretString::from(String::new()))
    }
}

impl std::fmt::Debug for Otp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Otp([REDACTED])")
    }
}
