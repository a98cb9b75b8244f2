//! Session store.
//!
//! Holds the currently authenticated user, if any. The store starts in
//! [`SessionState::Restoring`] and [`SessionStore::restore`] always resolves it
//! to exactly one of `Authenticated` or `Unauthenticated`:
//!
//! - no persisted token: unauthenticated, without contacting the backend
//! - token and a successful `GET /users/me`: authenticated with that profile
//! - token and a failed profile fetch: token cleared, unauthenticated
//!
//! Login and registration failures are ordinary return values carrying what
//! the form needs to render; they never change the current state.

use secrecy::SecretString;

use omniorder_core::Email;

use crate::api::{ApiClient, AuthResponse, RegisterRequest, User};
use crate::error::{ApiError, ErrorDetail};

/// Text shown when login fails without a usable server message.
pub const LOGIN_FAILED: &str = "Login failed";
/// Text shown when the login server detail is not a plain message.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
/// Text shown when registration fails without a server detail.
pub const REGISTRATION_FAILED: &str = "Registration failed";
/// Text shown when the registration detail is neither a message nor field errors.
pub const REGISTRATION_CHECK_INPUTS: &str = "Registration failed. Please check your inputs.";

/// Authentication state of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup: a persisted token may still be validated.
    Restoring,
    /// A user is signed in.
    Authenticated(User),
    /// Nobody is signed in.
    Unauthenticated,
}

impl SessionState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether the session is still being restored.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Restoring)
    }
}

/// Why a login or registration attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// The backend explained the rejection.
    Server(ErrorDetail),
    /// No explanation available (transport failure, empty body, local storage failure).
    Generic(&'static str),
}

impl AuthFailure {
    fn from_api(err: &ApiError, fallback: &'static str) -> Self {
        err.detail()
            .cloned()
            .map_or(Self::Generic(fallback), Self::Server)
    }

    /// Text for the login form's error region.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::Server(ErrorDetail::Message(message)) => message.clone(),
            Self::Server(_) => INVALID_CREDENTIALS.to_owned(),
            Self::Generic(message) => (*message).to_owned(),
        }
    }

    /// Text for the registration form's error region.
    ///
    /// Field errors are rendered as `field: message` pairs joined by commas.
    #[must_use]
    pub fn registration_message(&self) -> String {
        match self {
            Self::Server(detail @ (ErrorDetail::Message(_) | ErrorDetail::Fields(_))) => {
                detail.to_string()
            }
            Self::Server(ErrorDetail::Other(_)) => REGISTRATION_CHECK_INPUTS.to_owned(),
            Self::Generic(message) => (*message).to_owned(),
        }
    }
}

/// Client-side record of who is signed in.
#[derive(Debug)]
pub struct SessionStore {
    api: ApiClient,
    state: SessionState,
}

impl SessionStore {
    /// New store in the `Restoring` state. Call [`SessionStore::restore`] next.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: SessionState::Restoring,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// The HTTP client used by this store.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Resolve the startup state from the persisted token.
    pub async fn restore(&mut self) -> &SessionState {
        self.state = SessionState::Restoring;

        let token = match self.api.tokens().load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted token");
                None
            }
        };

        if token.is_none() {
            tracing::debug!("No persisted token, starting unauthenticated");
            self.state = SessionState::Unauthenticated;
            return &self.state;
        }

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.state = SessionState::Authenticated(user);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch user, discarding token");
                self.logout();
            }
        }

        &self.state
    }

    /// Sign in with email and password.
    ///
    /// On success the returned token is persisted and the user becomes current.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] to display; the state is left unchanged.
    pub async fn login(&mut self, email: &Email, password: &SecretString) -> Result<(), AuthFailure> {
        match self.api.login(email, password).await {
            Ok(response) => self.establish(response, LOGIN_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                Err(AuthFailure::from_api(&e, LOGIN_FAILED))
            }
        }
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthFailure`] to display, possibly carrying per-field
    /// validation errors; the state is left unchanged.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<(), AuthFailure> {
        match self.api.register(request).await {
            Ok(response) => self.establish(response, REGISTRATION_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                Err(AuthFailure::from_api(&e, REGISTRATION_FAILED))
            }
        }
    }

    /// Forget the token and the user. No backend call is made.
    pub fn logout(&mut self) {
        if let Err(e) = self.api.tokens().clear() {
            tracing::warn!(error = %e, "Could not clear persisted token");
        }
        if let Some(user) = self.state.user() {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        self.state = SessionState::Unauthenticated;
    }

    fn establish(&mut self, response: AuthResponse, fallback: &'static str) -> Result<(), AuthFailure> {
        if let Err(e) = self.api.tokens().save(&response.access_token) {
            tracing::error!(error = %e, "Could not persist access token");
            return Err(AuthFailure::Generic(fallback));
        }

        tracing::info!(user_id = %response.user.id, "Signed in");
        self.state = SessionState::Authenticated(response.user);
        Ok(())
    }
}
