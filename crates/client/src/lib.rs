//! OmniOrder client - session, password recovery and order flows.
//!
//! Control flow mirrors the application's views: a view calls the
//! [`SessionStore`] (or the [`ApiClient`] directly), the API client talks to
//! the backend, and the result updates session or view state. The
//! [`guard`](guard::guard) function then decides what each route shows.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration (base URL, token location)
//! - [`token`] - Persisted bearer token
//! - [`api`] - HTTP client and wire types
//! - [`session`] - Session store and login/registration failures
//! - [`routes`] / [`guard`] - Views, navigation bar, route guard
//! - [`forms`] - Login and registration forms
//! - [`recovery`] - Three-step password recovery flow
//! - [`orders`] - Order creation form and order list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod orders;
pub mod recovery;
pub mod routes;
pub mod session;
pub mod token;

pub use api::{ApiClient, User};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ErrorDetail, FieldError};
pub use guard::{GuardDecision, guard};
pub use routes::Route;
pub use session::{AuthFailure, SessionState, SessionStore};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
