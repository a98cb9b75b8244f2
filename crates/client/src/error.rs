//! Errors surfaced by the HTTP client.
//!
//! Failed responses keep the server's structured `detail` so flows can render
//! it: a plain message, a list of per-field validation errors, or anything
//! else the backend chose to send.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::token::TokenStoreError;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure (no HTTP response).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("API error: {status}{}", detail_suffix(.detail.as_ref()))]
    Api {
        status: StatusCode,
        detail: Option<ErrorDetail>,
    },

    /// Successful response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Persisted token could not be read.
    #[error("Token storage error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

fn detail_suffix(detail: Option<&ErrorDetail>) -> String {
    detail.map_or_else(String::new, |d| format!(" - {d}"))
}

impl ApiError {
    /// HTTP status, for errors that carry one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the credentials (401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Structured detail from the response body, if any.
    #[must_use]
    pub const fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Api { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}

/// One entry of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field (last element of the error location).
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The `detail` member of an error response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    /// `{"detail": "..."}`
    Message(String),
    /// `{"detail": [{"loc": [...], "msg": "..."}, ...]}`
    Fields(Vec<FieldError>),
    /// Any other `detail` value.
    Other(Value),
}

impl ErrorDetail {
    /// Extract the detail from a raw response body.
    ///
    /// Returns `None` for non-JSON bodies, bodies without `detail`, and empty
    /// or null details.
    #[must_use]
    pub fn from_body(body: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(body).ok()?;
        let detail = value.get("detail")?;

        match detail {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Self::Message(s.clone())),
            Value::Array(items) => Some(
                parse_field_errors(items).map_or_else(|| Self::Other(detail.clone()), Self::Fields),
            ),
            other => Some(Self::Other(other.clone())),
        }
    }

    /// The detail as a plain message, when it is one.
    #[must_use]
    pub fn as_message(&self) -> Option<&str> {
        match self {
            Self::Message(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Fields(fields) => {
                let joined = fields
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                f.write_str(&joined)
            }
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Parse a validation error list; `None` if any entry has the wrong shape.
fn parse_field_errors(items: &[Value]) -> Option<Vec<FieldError>> {
    items
        .iter()
        .map(|item| {
            let message = item.get("msg")?.as_str()?.to_owned();
            let field = match item.get("loc")?.as_array()?.last() {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            Some(FieldError { field, message })
        })
        .collect()
}
