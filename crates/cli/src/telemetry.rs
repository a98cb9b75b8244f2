//! Logging and error tracking setup.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log filter (default: `omniorder=info`)
//! - `SENTRY_DSN` - Sentry DSN; error tracking is off when unset
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use omniorder_client::User;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "omniorder=info,omniorder_client=info";

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;
    let environment = std::env::var("SENTRY_ENVIRONMENT").ok();

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: environment.map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber (stderr) and, if configured, Sentry.
///
/// Sentry must be initialized before the subscriber, so this does both.
pub fn init() -> Option<sentry::ClientInitGuard> {
    let sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::debug!("Sentry initialized");
    }
    sentry_guard
}

/// Associate subsequent Sentry events with the signed-in user.
pub fn set_user(user: &User) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user.id.to_string()),
            email: Some(user.email.to_string()),
            ..Default::default()
        }));
    });
}

/// Stop associating Sentry events with a user.
pub fn clear_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
