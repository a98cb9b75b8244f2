//! CLI commands. Each command plays the part of one view.

pub mod auth;
pub mod orders;
pub mod recovery;

use std::io::{BufRead, IsTerminal, Write};

use secrecy::SecretString;
use thiserror::Error;

use omniorder_client::guard::LOADING_TEXT;
use omniorder_client::routes::nav_bar;
use omniorder_client::{ApiError, ConfigError, GuardDecision, Route, SessionStore, User, guard};

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed outside of a form.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Reading from the terminal failed.
    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),

    /// Standard input ended while a form still needed values.
    #[error("Input closed before the form was complete")]
    InputClosed,

    /// A protected view was requested without a session.
    #[error("Not signed in. Run `omniorder login` first.")]
    NotSignedIn,

    /// A form was rejected; the message is what the form displays.
    #[error("{0}")]
    Form(String),
}

/// Ask for one line of input on stderr/stdin.
pub fn prompt(label: &str) -> Result<String, CliError> {
    show_label(label)?;
    read_answer(&mut std::io::stdin().lock())
}

/// Ask for a secret with terminal echo off.
///
/// When stdin is not a terminal (piped input) the line is read as-is.
pub fn prompt_secret(label: &str) -> Result<SecretString, CliError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let secret = rpassword::prompt_password(format!("{label}: "))?;
        return Ok(SecretString::from(secret));
    }
    show_label(label)?;
    read_secret(&mut stdin.lock())
}

fn show_label(label: &str) -> Result<(), CliError> {
    let mut stderr = std::io::stderr().lock();
    write!(stderr, "{label}: ")?;
    stderr.flush()?;
    Ok(())
}

fn read_answer(reader: &mut impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(CliError::InputClosed);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn read_secret(reader: &mut impl BufRead) -> Result<SecretString, CliError> {
    read_answer(reader).map(SecretString::from)
}

/// Use `value` if given, otherwise ask for it.
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String, CliError> {
    match value {
        Some(value) => Ok(value),
        None => prompt(label),
    }
}

/// Run the route guard for a protected view and return the signed-in user.
pub fn require_user(session: &SessionStore, route: Route) -> Result<&User, CliError> {
    match guard(session.state(), route) {
        GuardDecision::Render(_) => session.user().ok_or(CliError::NotSignedIn),
        GuardDecision::Redirect(to) => {
            tracing::info!("Redirecting to {to}");
            Err(CliError::NotSignedIn)
        }
        GuardDecision::Loading => {
            tracing::info!("{LOADING_TEXT}");
            Err(CliError::NotSignedIn)
        }
    }
}

/// Print the navigation bar when someone is signed in.
pub fn show_nav(session: &SessionStore) {
    if let Some(nav) = nav_bar(session.state()) {
        let links = nav
            .links
            .iter()
            .map(|(route, label)| format!("{label} ({route})"))
            .collect::<Vec<_>>()
            .join(" | ");
        tracing::info!("{} | {links} | {} | Logout", nav.brand, nav.user_name);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_piped_secret_strips_line_ending() {
        let mut input = Cursor::new("correct horse\r\nnext line\n");
        let secret = read_secret(&mut input).unwrap();
        assert_eq!(secret.expose_secret(), "correct horse");
        assert_eq!(read_answer(&mut input).unwrap(), "next line");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut input = Cursor::new("");
        assert!(matches!(read_secret(&mut input), Err(CliError::InputClosed)));
    }
}
