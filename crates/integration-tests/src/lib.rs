//! Integration tests for the OmniOrder client.
//!
//! Every test runs the client against a `wiremock` server standing in for
//! the backend, so no real services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p omniorder-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - session restore, login, registration, logout
//! - `recovery` - the three-step password reset
//! - `orders` - order list and order creation
//! - `routing` - route guard and navigation bar

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Value, json};
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;
use wiremock::MockServer;

use omniorder_client::{ApiClient, MemoryTokenStore, SessionStore, TokenStore};

/// Token the mock backend hands out.
pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test-token";

/// Mock backend plus a client pointed at its `/v1` prefix.
pub struct TestContext {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub api: ApiClient,
}

impl TestContext {
    /// Fresh backend and an empty token store.
    pub async fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new()).await
    }

    /// Fresh backend and a token store already holding [`TOKEN`].
    pub async fn signed_in() -> Self {
        Self::with_tokens(MemoryTokenStore::with_token(TOKEN)).await
    }

    async fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(tokens);
        let base = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        let api = ApiClient::with_base_url(&base, tokens.clone()).unwrap();
        Self {
            server,
            tokens,
            api,
        }
    }

    /// Session store sharing this context's client.
    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.api.clone())
    }

    /// The persisted token, exposed for comparison.
    pub fn stored_token(&self) -> Option<String> {
        use secrecy::ExposeSecret;

        self.tokens
            .load()
            .unwrap()
            .map(|token| token.expose_secret().to_owned())
    }
}

/// Profile as the backend returns it.
pub fn user_json() -> Value {
    json!({
        "id": "6650f1c2a1b2c3d4e5f60718",
        "first_name": "Asha",
        "last_name": "Rao",
        "email": "asha@example.com",
        "mobile_number": "9876543210",
        "address": {
            "street_address": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra",
            "postal_code": "411001",
            "country": "India"
        },
        "status": "active",
        "created_at": "2024-05-24T10:15:30.123000",
        "updated_at": "2024-05-24T10:15:30.123000"
    })
}

/// Login/registration response carrying [`TOKEN`].
pub fn auth_json() -> Value {
    json!({
        "message": "Login successful",
        "user": user_json(),
        "access_token": TOKEN,
        "token_type": "bearer"
    })
}

/// One order as the backend returns it.
pub fn order_json(id: &str, order_number: u64) -> Value {
    json!({
        "id": id,
        "user_id": "6650f1c2a1b2c3d4e5f60718",
        "item_name": "Fruit basket",
        "price": 499.99,
        "order_number": order_number,
        "item_list": ["Apple", "Banana", "Orange"],
        "Address": {
            "street_address": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra",
            "postal_code": "411001",
            "country": "India"
        },
        "status": "BOOKED",
        "item_created_at": "2024-05-25T08:00:00"
    })
}

/// `{"detail": ...}` error body.
pub fn detail(detail: Value) -> Value {
    json!({ "detail": detail })
}

/// Everything logged on the current thread while the guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install a capturing subscriber for the current thread.
    pub fn install() -> (Self, tracing::dispatcher::DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let guard = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish()
            .set_default();
        (capture, guard)
    }

    /// Captured output as text.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
