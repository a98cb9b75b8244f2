//! Sign-in, registration and sign-out commands.

use omniorder_client::forms::{LoginForm, RegisterForm};
use omniorder_client::SessionStore;
use omniorder_core::Address;

use super::{CliError, prompt_secret, show_nav, value_or_prompt};
use crate::telemetry;

/// Profile values for `register`; missing ones are prompted for.
#[derive(Debug, Default)]
pub struct RegisterArgs {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub address: Address,
}

/// Login view.
pub async fn login(
    session: &mut SessionStore,
    email: Option<String>,
) -> Result<(), CliError> {
    let email = value_or_prompt(email, "Email")?;
    let password = prompt_secret("Password")?;

    let mut form = LoginForm::new(email, password);
    if form.submit(session).await.is_none() {
        return Err(CliError::Form(
            form.error().unwrap_or("Login failed").to_owned(),
        ));
    }

    signed_in(session);
    Ok(())
}

/// Registration view.
pub async fn register(session: &mut SessionStore, args: RegisterArgs) -> Result<(), CliError> {
    let mut form = RegisterForm::new(secrecy::SecretString::from(String::new()));
    form.first_name = value_or_prompt(args.first_name, "First name")?;
    form.last_name = value_or_prompt(args.last_name, "Last name")?;
    form.email = value_or_prompt(args.email, "Email")?;
    form.mobile_number = value_or_prompt(args.mobile_number, "Mobile number")?;
    form.password = prompt_secret("Password")?;
    form.address = args.address;

    if form.submit(session).await.is_none() {
        return Err(CliError::Form(
            form.error().unwrap_or("Registration failed").to_owned(),
        ));
    }

    signed_in(session);
    Ok(())
}

/// Forget the persisted token.
pub fn logout(session: &mut SessionStore) {
    session.logout();
    telemetry::clear_user();
    tracing::info!("Signed out");
}

/// Show the signed-in user.
pub fn whoami(session: &SessionStore) -> Result<(), CliError> {
    let user = session.user().ok_or(CliError::NotSignedIn)?;
    show_nav(session);
    tracing::info!("{} <{}>", user.full_name(), user.email);
    if !user.mobile_number.is_empty() {
        tracing::info!("Mobile: {}", user.mobile_number);
    }
    if let Some(address) = &user.address {
        tracing::info!("Address: {}", address.one_line());
    }
    Ok(())
}

fn signed_in(session: &SessionStore) {
    if let Some(user) = session.user() {
        telemetry::set_user(user);
        tracing::info!("Signed in as {}", user.full_name());
    }
    show_nav(session);
}
