//! Shared HTTP client handle for Sakura Cloud APIs.
//!
//! A [`Client`] bundles the transport with credentials, user agent and
//! timeout. API-specific clients take a copy configured through
//! [`Client::dup_with`] so one handle can serve several APIs, each identifying
//! itself with its own user agent.

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Method, RequestBuilder};
use thiserror::Error;
use url::Url;

use crate::config::SakuraConfig;

/// User agent sent when no API-specific agent has been applied.
pub const DEFAULT_USER_AGENT: &str = concat!("saclient-rs/", env!("CARGO_PKG_VERSION"));

/// Timeout applied to each request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Access token pair used for HTTP basic authentication.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    /// Access token (the basic-auth user name).
    pub access_token: String,
    /// Access token secret (the basic-auth password).
    pub access_token_secret: String,
}

impl Credentials {
    /// Builds a credential pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, access_token_secret: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Adjustment applied by [`Client::dup_with`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientOption {
    /// Replaces the user agent.
    UserAgent(String),
    /// Replaces the credentials.
    Credentials(Credentials),
    /// Replaces the per-request timeout.
    Timeout(Duration),
}

/// Errors raised while configuring a [`Client`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not be built from the configured options.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client handle carrying credentials and request defaults.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    credentials: Option<Credentials>,
    user_agent: String,
    timeout: Duration,
}

impl Client {
    /// Creates an unauthenticated handle with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the platform TLS or resolver
    /// backend cannot be initialised.
    pub fn new() -> Result<Self, ClientError> {
        Ok(Self {
            http: build_transport(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)?,
            credentials: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Creates a handle that authenticates with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] under the same conditions as
    /// [`Client::new`].
    pub fn with_credentials(credentials: Credentials) -> Result<Self, ClientError> {
        Ok(Self {
            credentials: Some(credentials),
            ..Self::new()?
        })
    }

    /// Creates a handle from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the transport cannot be built.
    pub fn from_config(config: &SakuraConfig) -> Result<Self, ClientError> {
        let mut options = vec![ClientOption::Credentials(config.credentials())];
        if let Some(timeout) = config.timeout() {
            options.push(ClientOption::Timeout(timeout));
        }
        Self::new()?.dup_with(&options)
    }

    /// Returns a copy of this handle with `options` applied on top of the
    /// current settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the resulting settings cannot
    /// produce a transport, for example a user agent that is not a valid
    /// header value.
    pub fn dup_with(&self, options: &[ClientOption]) -> Result<Self, ClientError> {
        let mut next = self.clone();
        for option in options {
            match option {
                ClientOption::UserAgent(agent) => next.user_agent.clone_from(agent),
                ClientOption::Credentials(credentials) => {
                    next.credentials = Some(credentials.clone());
                }
                ClientOption::Timeout(timeout) => next.timeout = *timeout,
            }
        }
        next.http = build_transport(&next.user_agent, next.timeout)?;
        Ok(next)
    }

    /// User agent sent with each request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Credentials used for basic authentication, if any.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Starts a request to `url` with the JSON accept header and credentials
    /// applied.
    #[must_use]
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        match &self.credentials {
            Some(credentials) => builder.basic_auth(
                &credentials.access_token,
                Some(&credentials.access_token_secret),
            ),
            None => builder,
        }
    }
}

fn build_transport(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?)
}
