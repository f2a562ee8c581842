//! Error type shared by the operation facades.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tracing::debug;

use crate::apis::v1::{InvokeError, InvokeFuture};

/// Future returned by facade operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Underlying reason for an [`ApiError`].
#[derive(Debug, Error)]
pub enum ApiErrorCause {
    /// Message from a structured error response.
    #[error("{0}")]
    Remote(String),
    /// Any other failure surfaced by the client.
    #[error(transparent)]
    Transport(InvokeError),
}

/// Failure of a single facade operation.
///
/// Structured remote errors keep their HTTP status and message; every other
/// failure is reported with status 0 and the original error as its cause.
#[derive(Debug, Error)]
#[error("{method}: {}", describe(.status_code, .cause))]
pub struct ApiError {
    method: &'static str,
    status_code: u16,
    #[source]
    cause: ApiErrorCause,
}

fn describe(status_code: &u16, cause: &ApiErrorCause) -> String {
    if *status_code == 0 {
        cause.to_string()
    } else {
        format!("status {status_code}: {cause}")
    }
}

impl ApiError {
    /// Builds an error for operation `method`.
    #[must_use]
    pub const fn new(method: &'static str, status_code: u16, cause: ApiErrorCause) -> Self {
        Self {
            method,
            status_code,
            cause,
        }
    }

    /// Normalises a client failure for operation `method`.
    #[must_use]
    pub fn from_invoke(method: &'static str, err: InvokeError) -> Self {
        match err {
            InvokeError::Status(status) => {
                let response = *status.response;
                Self::new(
                    method,
                    status.status_code,
                    ApiErrorCause::Remote(response.error_msg),
                )
            }
            other => Self::new(method, 0, ApiErrorCause::Transport(other)),
        }
    }

    /// Operation that failed, for example `Contract.Read`.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }

    /// HTTP status of a structured remote error, or 0.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Message of the underlying cause.
    #[must_use]
    pub fn message(&self) -> String {
        self.cause.to_string()
    }

    /// Underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &ApiErrorCause {
        &self.cause
    }

    /// Whether the service reported that the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

/// Awaits one client call on behalf of operation `method`.
pub(crate) async fn call<T>(
    method: &'static str,
    request: InvokeFuture<'_, T>,
) -> Result<T, ApiError> {
    debug!(method, "calling dedicated storage API");
    request.await.map_err(|err| {
        let error = ApiError::from_invoke(method, err);
        debug!(
            method,
            status = error.status_code(),
            error = %error,
            "dedicated storage API call failed"
        );
        error
    })
}
