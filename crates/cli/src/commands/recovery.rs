//! Interactive password recovery.

use omniorder_client::recovery::{RecoveryFlow, RecoveryStep};
use omniorder_client::SessionStore;

use super::{CliError, auth, prompt, prompt_secret};

/// Typed at the code prompt to go back and use another email.
const CHANGE_EMAIL: &str = "change";

/// Walk through the recovery steps, then continue to the login view.
pub async fn run(session: &mut SessionStore, email: Option<String>) -> Result<(), CliError> {
    let api = session.api().clone();
    let mut flow = RecoveryFlow::new();
    let mut email = email;

    loop {
        let step = flow.step();
        tracing::info!("{}: {}", step.title(), step.prompt());

        match step {
            RecoveryStep::RequestCode => {
                let value = match email.take() {
                    Some(value) => value,
                    None if flow.email().is_empty() => prompt("Email")?,
                    None => {
                        let typed = prompt(&format!("Email [{}]", flow.email()))?;
                        if typed.trim().is_empty() {
                            flow.email().to_owned()
                        } else {
                            typed
                        }
                    }
                };
                flow.set_email(&value);
                flow.request_code(&api).await;
            }
            RecoveryStep::VerifyCode => {
                let input = prompt(&format!("OTP (or \"{CHANGE_EMAIL}\" to use another email)"))?;
                if input.trim().eq_ignore_ascii_case(CHANGE_EMAIL) {
                    flow.change_email();
                    continue;
                }
                flow.set_otp(&input);
                flow.verify_code(&api).await;
            }
            RecoveryStep::SetPassword => {
                flow.set_new_password(prompt_secret("New password")?);
                flow.set_confirm_password(prompt_secret("Confirm password")?);
                if let Some(redirect) = flow.reset_password(&api).await {
                    report(&flow);
                    let route = redirect.wait().await;
                    tracing::info!("Redirecting to {route}");
                    let email = flow.email().to_owned();
                    return auth::login(session, Some(email)).await;
                }
            }
        }

        report(&flow);
    }
}

fn report(flow: &RecoveryFlow) {
    if let Some(message) = flow.success() {
        tracing::info!("{message}");
    }
    if let Some(message) = flow.error() {
        tracing::warn!("{message}");
    }
}
