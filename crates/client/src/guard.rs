//! Route guard for views that need a signed-in user.
//!
//! The guard is a pure function of the session state. Redirects always go to
//! the login view; the originally requested location is not remembered.

use crate::routes::Route;
use crate::session::SessionState;

/// What to show for a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still restoring: show a loading placeholder.
    Loading,
    /// Send the visitor elsewhere instead.
    Redirect(Route),
    /// Show the requested view.
    Render(Route),
}

/// Placeholder text while the session is restoring.
pub const LOADING_TEXT: &str = "Loading...";

/// Decide how to handle a navigation to `requested`.
#[must_use]
pub const fn guard(state: &SessionState, requested: Route) -> GuardDecision {
    if !requested.requires_auth() {
        return GuardDecision::Render(requested);
    }

    match state {
        SessionState::Restoring => GuardDecision::Loading,
        SessionState::Unauthenticated => GuardDecision::Redirect(Route::Login),
        SessionState::Authenticated(_) => GuardDecision::Render(requested),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use omniorder_core::{Email, UserId};

    use super::*;
    use crate::api::User;

    fn signed_in() -> SessionState {
        SessionState::Authenticated(User {
            id: UserId::new("u1"),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: Email::parse("asha@example.com").unwrap(),
            mobile_number: "9876543210".into(),
            address: None,
            status: "active".into(),
            created_at: None,
            updated_at: None,
        })
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        for route in [Route::Orders, Route::NewOrder] {
            assert_eq!(
                guard(&SessionState::Unauthenticated, route),
                GuardDecision::Redirect(Route::Login)
            );
        }
    }

    #[test]
    fn test_authenticated_renders_protected_view() {
        let state = signed_in();
        assert_eq!(guard(&state, Route::NewOrder), GuardDecision::Render(Route::NewOrder));
        assert_eq!(guard(&state, Route::Orders), GuardDecision::Render(Route::Orders));
    }

    #[test]
    fn test_restoring_shows_loading() {
        assert_eq!(guard(&SessionState::Restoring, Route::Orders), GuardDecision::Loading);
    }

    #[test]
    fn test_public_views_always_render() {
        for state in [SessionState::Restoring, SessionState::Unauthenticated, signed_in()] {
            assert_eq!(guard(&state, Route::Login), GuardDecision::Render(Route::Login));
            assert_eq!(
                guard(&state, Route::ForgotPassword),
                GuardDecision::Render(Route::ForgotPassword)
            );
        }
    }

    #[test]
    fn test_never_both_redirect_and_protected_content() {
        for state in [SessionState::Restoring, SessionState::Unauthenticated, signed_in()] {
            let decision = guard(&state, Route::Orders);
            let renders_protected = decision == GuardDecision::Render(Route::Orders);
            let redirects = matches!(decision, GuardDecision::Redirect(_));
            assert!(!(renders_protected && redirects));
            assert_eq!(renders_protected, state.user().is_some());
            assert_eq!(redirects, state == SessionState::Unauthenticated);
        }
    }
}
