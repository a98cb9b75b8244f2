//! HTTP client for the OmniOrder REST backend.
//!
//! Every request goes to a path under the configured base URL, carries
//! `Content-Type: application/json`, and carries `Authorization: Bearer
//! <token>` whenever a token is persisted. The token store is read on every
//! call, so a login or logout takes effect for the next request.
//!
//! Failed responses are returned as [`ApiError::Api`] with the server's
//! `detail` parsed. A `401` additionally invokes the unauthorized hook, if one
//! is installed; the client itself does not clear the token or otherwise
//! react to it.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use omniorder_client::{ApiClient, ClientConfig, FileTokenStore};
//!
//! let config = ClientConfig::from_env()?;
//! let tokens = Arc::new(FileTokenStore::new(&config.token_path));
//! let api = ApiClient::new(&config, tokens)?;
//!
//! let orders = api.list_orders(None).await?;
//! ```

mod types;

pub use types::*;

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use omniorder_core::{Email, Otp, OrderId};

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorDetail};
use crate::token::TokenStore;

/// Callback invoked with the request path whenever the backend answers 401.
pub type UnauthorizedHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Arc<str>,
    tokens: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("tokens", &self.tokens)
            .field("on_unauthorized", &self.on_unauthorized.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_base_url(&config.api_base_url, tokens)
    }

    /// Create a client for an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(base_url: &Url, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("omniorder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.as_str().trim_end_matches('/')),
            tokens,
            on_unauthorized: None,
        })
    }

    /// Install a callback observing `401 Unauthorized` responses.
    #[must_use]
    pub fn with_unauthorized_hook(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// The token store this client reads credentials from.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Full URL for an endpoint path (`/users/me` -> `<base>/users/me`).
    ///
    /// # Errors
    ///
    /// Returns an error if the joined string is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{path}", self.base_url))?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request plumbing
    // ─────────────────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(Method::GET, url, None::<&()>).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, url, Some(body)).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let path = url.path().to_owned();
        let mut request = self.client.request(method.clone(), url);

        if let Some(token) = self.tokens.load()? {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path = %path, "Sending request");
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(%method, path = %path, error = %e, "Request failed");
        })?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = ErrorDetail::from_body(&body);

            if status == StatusCode::UNAUTHORIZED {
                self.observe_unauthorized(&path);
            }

            tracing::debug!(%method, path = %path, status = status.as_u16(), "Request rejected");
            return Err(ApiError::Api { status, detail });
        }

        let bytes = response.bytes().await?;
        let bytes: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
        Ok(serde_json::from_slice(bytes)?)
    }

    fn observe_unauthorized(&self, path: &str) {
        tracing::info!(path = %path, "Backend answered 401 Unauthorized");
        if let Some(hook) = &self.on_unauthorized {
            hook(path);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange credentials for a user and access token (`POST /user_login`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or credentials are rejected.
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthResponse, ApiError> {
        let body = LoginBody {
            email: email.as_str(),
            password: password.expose_secret(),
        };
        self.post(self.endpoint("/user_login")?, &body).await
    }

    /// Register a new account (`POST /users`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the profile is rejected.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = RegisterBody {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: request.email.as_str(),
            mobile_number: &request.mobile_number,
            password: request.password.expose_secret(),
            address: request.address.as_ref(),
        };
        self.post(self.endpoint("/users")?, &body).await
    }

    /// Fetch the user the persisted token belongs to (`GET /users/me`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the token is not accepted.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get(self.endpoint("/users/me")?).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Password recovery
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask the backend to email a one-time code (`POST /users/forgot_password`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the email is unknown.
    pub async fn forgot_password(&self, email: &Email) -> Result<MessageResponse, ApiError> {
        let body = EmailBody {
            email: email.as_str(),
        };
        self.post(self.endpoint("/users/forgot_password")?, &body)
            .await
    }

    /// Check a one-time code (`POST /users/verify_otp`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the code is invalid or expired.
    pub async fn verify_otp(&self, email: &Email, otp: &Otp) -> Result<MessageResponse, ApiError> {
        let body = VerifyOtpBody {
            email: email.as_str(),
            otp: otp.expose(),
        };
        self.post(self.endpoint("/users/verify_otp")?, &body).await
    }

    /// Set a new password, re-presenting the verified code
    /// (`POST /users/reset_password_with_otp`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the reset.
    pub async fn reset_password_with_otp(
        &self,
        email: &Email,
        otp: &Otp,
        new_password: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        let body = ResetPasswordBody {
            email: email.as_str(),
            otp: otp.expose(),
            new_password: new_password.expose_secret(),
        };
        self.post(self.endpoint("/users/reset_password_with_otp")?, &body)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Orders
    // ─────────────────────────────────────────────────────────────────────────

    /// List the current user's orders (`GET /orders`).
    ///
    /// Without a page the backend applies its default window.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn list_orders(&self, page: Option<Page>) -> Result<OrderListResponse, ApiError> {
        let mut url = self.endpoint("/orders")?;
        if let Some(page) = page {
            url.query_pairs_mut()
                .append_pair("skip", &page.skip.to_string())
                .append_pair("limit", &page.limit.to_string());
        }
        self.get(url).await
    }

    /// Fetch a single order (`GET /orders/{id}`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the order is not visible.
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let mut url = self.endpoint("/orders")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id.as_str());
        self.get(url).await
    }

    /// Create an order (`POST /orders`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the order is rejected.
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<OrderMessageResponse, ApiError> {
        self.post(self.endpoint("/orders")?, request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::token::MemoryTokenStore;

    fn client(server: &MockServer, tokens: MemoryTokenStore) -> ApiClient {
        let base = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        ApiClient::with_base_url(&base, Arc::new(tokens)).unwrap()
    }

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": "u1",
            "first_name": "Asha",
            "last_name": "Rao",
            "email": "asha@example.com",
            "mobile_number": "9876543210",
            "status": "active"
        })
    }

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let base = Url::parse("http://backend:8000/v1/").unwrap();
        let api = ApiClient::with_base_url(&base, Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(
            api.endpoint("/users/me").unwrap().as_str(),
            "http://backend:8000/v1/users/me"
        );
        assert_eq!(
            api.endpoint("orders").unwrap().as_str(),
            "http://backend:8000/v1/orders"
        );
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/me"))
            .and(header("authorization", "Bearer stored-token"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, MemoryTokenStore::with_token("stored-token"));
        let user = api.current_user().await.unwrap();
        assert_eq!(user.first_name, "Asha");
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/users/forgot_password"))
            .and(body_json(serde_json::json!({"email": "asha@example.com"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "sent"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, MemoryTokenStore::new());
        let email = Email::parse("asha@example.com").unwrap();
        let response = api.forgot_password(&email).await.unwrap();
        assert_eq!(response.message.as_deref(), Some("sent"));

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| !r.headers.contains_key("authorization")));
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/user_login"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"detail": "Invalid email or password"})),
            )
            .mount(&server)
            .await;

        let api = client(&server, MemoryTokenStore::new());
        let err = api
            .login(
                &Email::parse("asha@example.com").unwrap(),
                &SecretString::from("wrong-password"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            err.detail().and_then(ErrorDetail::as_message),
            Some("Invalid email or password")
        );
    }

    #[tokio::test]
    async fn test_unauthorized_hook_observes_without_clearing_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orders"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"detail": "Invalid or expired token"})),
            )
            .mount(&server)
            .await;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let tokens = Arc::new(MemoryTokenStore::with_token("expired"));
        let base = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        let api = ApiClient::with_base_url(&base, tokens.clone())
            .unwrap()
            .with_unauthorized_hook(move |path| {
                assert_eq!(path, "/v1/orders");
                seen.fetch_add(1, Ordering::SeqCst);
            });

        let err = api.list_orders(None).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tokens.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_orders_paging_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orders"))
            .and(query_param("skip", "10"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"orders": [], "total": 12})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, MemoryTokenStore::with_token("t"));
        let response = api
            .list_orders(Some(Page { skip: 10, limit: 5 }))
            .await
            .unwrap();
        assert!(response.orders.is_empty());
        assert_eq!(response.total, Some(12));
    }

    #[tokio::test]
    async fn test_get_order_escapes_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/orders/abc%2F123"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                serde_json::json!({"detail": "Order not found"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, MemoryTokenStore::with_token("t"));
        let err = api.get_order(&OrderId::new("abc/123")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_transport_failure_is_http_error() {
        let server = MockServer::start().await;
        let base = Url::parse(&format!("{}/v1", server.uri())).unwrap();
        drop(server);

        let api = ApiClient::with_base_url(&base, Arc::new(MemoryTokenStore::new())).unwrap();
        let err = api.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
