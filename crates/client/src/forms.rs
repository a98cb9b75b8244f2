//! Login and registration forms.
//!
//! Each form owns its own error region. Submitting clears the previous error,
//! calls the session store, and either yields the route to navigate to or
//! leaves a message for display.

use secrecy::{ExposeSecret, SecretString};

use omniorder_core::{Address, Email};

use crate::api::RegisterRequest;
use crate::recovery::MIN_PASSWORD_LENGTH;
use crate::routes::Route;
use crate::session::SessionStore;

/// The login form.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
    error: Option<String>,
    loading: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
            error: None,
            loading: false,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sign in. Returns the order list route on success.
    pub async fn submit(&mut self, session: &mut SessionStore) -> Option<Route> {
        self.loading = true;
        self.error = None;

        let result = match Email::parse(&self.email) {
            Ok(email) => session
                .login(&email, &self.password)
                .await
                .map_err(|failure| failure.login_message()),
            Err(e) => Err(format!("Invalid email: {e}")),
        };

        self.loading = false;
        match result {
            Ok(()) => Some(Route::Orders),
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }
}

/// The registration form.
#[derive(Debug)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password: SecretString,
    pub address: Address,
    error: Option<String>,
    loading: bool,
}

impl RegisterForm {
    /// Blank form; the address starts with the default country.
    #[must_use]
    pub fn new(password: SecretString) -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            mobile_number: String::new(),
            password,
            address: Address::default(),
            error: None,
            loading: false,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Create the account. Returns the order list route on success.
    ///
    /// A password shorter than [`MIN_PASSWORD_LENGTH`] is rejected without a
    /// request. Field-level validation errors from the backend are shown as
    /// `field: message` pairs.
    pub async fn submit(&mut self, session: &mut SessionStore) -> Option<Route> {
        self.loading = true;
        self.error = None;

        let result = match Email::parse(&self.email) {
            Err(e) => Err(format!("email: {e}")),
            Ok(_) if self.password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH => Err(
                format!("password: must be at least {MIN_PASSWORD_LENGTH} characters"),
            ),
            Ok(email) => {
                let request = RegisterRequest {
                    first_name: self.first_name.trim().to_owned(),
                    last_name: self.last_name.trim().to_owned(),
                    email,
                    mobile_number: self.mobile_number.trim().to_owned(),
                    password: self.password.clone(),
                    address: Some(self.address.clone()),
                };
                session
                    .register(&request)
                    .await
                    .map_err(|failure| failure.registration_message())
            }
        };

        self.loading = false;
        match result {
            Ok(()) => Some(Route::Orders),
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::token::MemoryTokenStore;

    fn offline_session() -> SessionStore {
        // Nothing listens here; a request would fail with "Registration failed".
        let base = Url::parse("http://127.0.0.1:9/v1").unwrap();
        let api = ApiClient::with_base_url(&base, Arc::new(MemoryTokenStore::new())).unwrap();
        SessionStore::new(api)
    }

    fn filled_form(password: &str) -> RegisterForm {
        let mut form = RegisterForm::new(SecretString::from(password));
        form.first_name = "Asha".into();
        form.last_name = "Rao".into();
        form.email = "asha@example.com".into();
        form.mobile_number = "9876543210".into();
        form
    }

    #[tokio::test]
    async fn test_register_short_password_rejected_locally() {
        let mut session = offline_session();
        let mut form = filled_form("seven77");

        assert_eq!(form.submit(&mut session).await, None);
        assert_eq!(form.error(), Some("password: must be at least 8 characters"));
        assert!(!form.is_loading());
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_register_invalid_email_reported_first() {
        let mut session = offline_session();
        let mut form = filled_form("short");
        form.email = "asha".into();

        assert_eq!(form.submit(&mut session).await, None);
        assert!(form.error().unwrap().starts_with("email: "));
    }

    #[tokio::test]
    async fn test_register_eight_characters_reaches_backend() {
        let mut session = offline_session();
        let mut form = filled_form("eight888");

        assert_eq!(form.submit(&mut session).await, None);
        assert_eq!(form.error(), Some("Registration failed"));
    }
}
