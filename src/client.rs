//! Construction of API clients bound to a zone root URL.

use std::sync::LazyLock;

use thiserror::Error;

use crate::apis::v1;
use crate::saclient::{self, ClientOption};

/// Root URL of the dedicated storage API in the `tk1b` zone.
pub const DEFAULT_API_ROOT_URL: &str = "https://secure.sakura.ad.jp/cloud/zone/tk1b/api/cloud/1.0/";

/// Crate version stamped into [`USER_AGENT`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent identifying this library, its platform and its home page.
pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "dedicated-storage-api-rs/{VERSION} ({}/{}; +https://github.com/sacloud/dedicated-storage-api-rs)",
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
});

/// Errors raised while building an API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP handle could not be reconfigured.
    #[error(transparent)]
    Http(#[from] saclient::ClientError),
    /// The root URL is not an absolute URL.
    #[error("invalid API root URL: {0}")]
    RootUrl(#[from] url::ParseError),
}

/// Builds a client for the default zone.
///
/// # Errors
///
/// Returns [`ClientError`] when the handle cannot be duplicated with the
/// library user agent.
pub fn new_client(client: &saclient::Client) -> Result<v1::Client, ClientError> {
    new_client_with_api_root_url(client, DEFAULT_API_ROOT_URL)
}

/// Builds a client bound to `api_root_url`.
///
/// The caller's handle is left untouched; the returned client owns a copy
/// that identifies itself with [`USER_AGENT`].
///
/// # Errors
///
/// Returns [`ClientError::Http`] when the handle cannot be duplicated and
/// [`ClientError::RootUrl`] when `api_root_url` does not parse.
pub fn new_client_with_api_root_url(
    client: &saclient::Client,
    api_root_url: &str,
) -> Result<v1::Client, ClientError> {
    let http = client.dup_with(&[ClientOption::UserAgent(USER_AGENT.clone())])?;
    Ok(v1::Client::new(api_root_url, http)?)
}
