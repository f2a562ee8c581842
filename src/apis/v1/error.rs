//! Errors returned by the low-level client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error document returned by the service alongside a non-2xx status.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// Whether the service considers the failure permanent.
    #[serde(default)]
    pub is_fatal: bool,
    /// Request serial assigned by the service, useful for support enquiries.
    #[serde(default)]
    pub serial: String,
    /// Status line echoed by the service (for example `404 Not Found`).
    #[serde(default)]
    pub status: String,
    /// Machine readable error code.
    #[serde(default)]
    pub error_code: String,
    /// Human readable message.
    #[serde(default)]
    pub error_msg: String,
}

/// A non-2xx response together with its decoded error document.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unexpected status code {status_code}: {}", .response.error_msg)]
pub struct ErrorStatusCode {
    /// HTTP status code.
    pub status_code: u16,
    /// Decoded error document.
    pub response: Box<ErrorResponse>,
}

impl ErrorStatusCode {
    /// Builds a status error carrying only a message.
    #[must_use]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            response: Box::new(ErrorResponse {
                error_msg: message.into(),
                ..ErrorResponse::default()
            }),
        }
    }
}

/// Classifies a non-2xx body. Only an error document yields
/// [`InvokeError::Status`]; anything else is kept verbatim as
/// [`InvokeError::UnexpectedResponse`].
pub(crate) fn error_from_body(status_code: u16, body: &[u8]) -> InvokeError {
    serde_json::from_slice::<ErrorResponse>(body).map_or_else(
        |_| InvokeError::UnexpectedResponse {
            status_code,
            body: String::from_utf8_lossy(body).trim().to_owned(),
        },
        |response| {
            InvokeError::Status(ErrorStatusCode {
                status_code,
                response: Box::new(response),
            })
        },
    )
}

/// Errors raised while invoking an endpoint.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The service answered with a non-2xx status.
    #[error(transparent)]
    Status(#[from] ErrorStatusCode),
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A non-2xx response whose body is not an error document, such as a
    /// proxy's HTML page.
    #[error("unexpected response status {status_code}: {body}")]
    UnexpectedResponse {
        /// HTTP status code.
        status_code: u16,
        /// Raw body text, trimmed.
        body: String,
    },
    /// A 2xx response body did not match the expected schema.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The endpoint path could not be joined onto the root URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl InvokeError {
    /// Returns the structured remote error when the service produced one.
    #[must_use]
    pub const fn as_status(&self) -> Option<&ErrorStatusCode> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }
}
