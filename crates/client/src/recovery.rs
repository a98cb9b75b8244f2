//! Password recovery flow.
//!
//! Three steps, in order:
//!
//! 1. [`RecoveryStep::RequestCode`] - submit the email; the backend mails a code.
//! 2. [`RecoveryStep::VerifyCode`] - submit email and code for checking.
//! 3. [`RecoveryStep::SetPassword`] - submit the new password twice. The two
//!    entries must match before anything is sent; the reset request carries
//!    the email, the code again and the new password.
//!
//! The only backward move is "change email" from step 2 back to step 1. Every
//! attempt clears the previous error and success message first, so messages
//! never bleed from one attempt into the next. The flow lives only as long as
//! the form; dropping it discards everything typed.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use omniorder_core::{Email, Otp};

use crate::api::ApiClient;
use crate::error::{ApiError, ErrorDetail};
use crate::routes::Route;

/// Minimum length the new-password fields accept.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Pause between a successful reset and the redirect to login.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Error shown when the new password and its confirmation differ.
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

const SEND_FAILED: &str = "Failed to send OTP. Please check the email.";
const VERIFY_FAILED: &str = "Invalid OTP or expired.";
const RESET_FAILED: &str = "Failed to reset password.";
const CODE_VERIFIED: &str = "OTP Verified! Please set your new password.";
const RESET_DONE: &str = "Password reset successfully! Redirecting to login...";

/// Position in the recovery flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryStep {
    #[default]
    RequestCode,
    VerifyCode,
    SetPassword,
}

impl RecoveryStep {
    /// Heading for the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::RequestCode => "Forgot Password",
            Self::VerifyCode => "Verify OTP",
            Self::SetPassword => "Reset Password",
        }
    }

    /// Instruction line for the step.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::RequestCode => "Enter your email to receive an OTP",
            Self::VerifyCode => "Enter the OTP sent to your email",
            Self::SetPassword => "Create a new password",
        }
    }
}

/// A scheduled navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

impl Redirect {
    /// Sleep for the delay and hand back the destination.
    pub async fn wait(self) -> Route {
        tokio::time::sleep(self.after).await;
        self.to
    }
}

/// State of the forgot-password form.
#[derive(Debug, Default)]
pub struct RecoveryFlow {
    step: RecoveryStep,
    email: String,
    otp: Otp,
    new_password: Option<SecretString>,
    confirm_password: Option<SecretString>,
    error: Option<String>,
    success: Option<String>,
    loading: bool,
}

impl RecoveryFlow {
    /// Fresh flow at the first step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn step(&self) -> RecoveryStep {
        self.step
    }

    /// Message for the error region, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message for the success region, if any.
    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Whether a request is in flight (or a redirect is pending).
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: &str) {
        email.clone_into(&mut self.email);
    }

    /// Set the code; input beyond [`Otp::LENGTH`] characters is dropped.
    pub fn set_otp(&mut self, input: &str) {
        self.otp = Otp::from_input(input);
    }

    pub fn set_new_password(&mut self, password: SecretString) {
        self.new_password = Some(password);
    }

    pub fn set_confirm_password(&mut self, password: SecretString) {
        self.confirm_password = Some(password);
    }

    /// Go back from code verification to the email step.
    ///
    /// Typed values and messages are kept. Returns whether the step changed;
    /// outside the verify step this does nothing.
    pub fn change_email(&mut self) -> bool {
        if self.step == RecoveryStep::VerifyCode {
            self.step = RecoveryStep::RequestCode;
            true
        } else {
            false
        }
    }

    /// Step 1: ask the backend to send a code. Returns whether the flow advanced.
    pub async fn request_code(&mut self, api: &ApiClient) -> bool {
        if !self.expect_step(RecoveryStep::RequestCode) {
            return false;
        }
        self.begin();

        let Some(email) = self.parsed_email() else {
            return false;
        };

        match api.forgot_password(&email).await {
            Ok(_) => {
                tracing::info!("Recovery code requested");
                self.step = RecoveryStep::VerifyCode;
                self.succeed(format!("OTP sent to {email}"));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recovery code request failed");
                self.fail(failure_text(&e, SEND_FAILED));
                false
            }
        }
    }

    /// Step 2: check the code. Returns whether the flow advanced.
    pub async fn verify_code(&mut self, api: &ApiClient) -> bool {
        if !self.expect_step(RecoveryStep::VerifyCode) {
            return false;
        }
        self.begin();

        let Some(email) = self.parsed_email() else {
            return false;
        };
        if self.otp.is_empty() {
            self.fail("Please enter the OTP".to_owned());
            return false;
        }

        match api.verify_otp(&email, &self.otp).await {
            Ok(_) => {
                tracing::info!("Recovery code verified");
                self.step = RecoveryStep::SetPassword;
                self.succeed(CODE_VERIFIED.to_owned());
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recovery code rejected");
                self.fail(failure_text(&e, VERIFY_FAILED));
                false
            }
        }
    }

    /// Step 3: set the new password.
    ///
    /// Mismatched or too-short entries are rejected locally without a request.
    /// On success returns the redirect to the login view.
    pub async fn reset_password(&mut self, api: &ApiClient) -> Option<Redirect> {
        if !self.expect_step(RecoveryStep::SetPassword) {
            return None;
        }

        let new_password = self.new_password.clone().unwrap_or_else(empty_secret);
        let confirm = self.confirm_password.clone().unwrap_or_else(empty_secret);

        if new_password.expose_secret().as_bytes() != confirm.expose_secret().as_bytes() {
            self.fail(PASSWORDS_DO_NOT_MATCH.to_owned());
            return None;
        }
        if new_password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            self.fail(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            ));
            return None;
        }

        self.begin();
        let email = self.parsed_email()?;

        match api
            .reset_password_with_otp(&email, &self.otp, &new_password)
            .await
        {
            Ok(_) => {
                tracing::info!("Password reset");
                self.succeed(RESET_DONE.to_owned());
                // The form stays disabled until the redirect fires.
                self.loading = true;
                Some(Redirect {
                    to: Route::Login,
                    after: REDIRECT_DELAY,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Password reset failed");
                self.fail(failure_text(&e, RESET_FAILED));
                None
            }
        }
    }

    fn expect_step(&self, step: RecoveryStep) -> bool {
        if self.step == step {
            return true;
        }
        tracing::debug!(expected = ?step, actual = ?self.step, "Ignoring submit for another step");
        false
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = None;
    }

    fn succeed(&mut self, message: String) {
        self.loading = false;
        self.success = Some(message);
    }

    fn fail(&mut self, message: String) {
        self.loading = false;
        self.success = None;
        self.error = Some(message);
    }

    fn parsed_email(&mut self) -> Option<Email> {
        match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                self.fail(format!("Invalid email: {e}"));
                None
            }
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Server detail if it says something, else the step's default message.
fn failure_text(err: &ApiError, fallback: &str) -> String {
    match err.detail() {
        Some(detail @ (ErrorDetail::Message(_) | ErrorDetail::Fields(_))) => detail.to_string(),
        _ => fallback.to_owned(),
    }
}
