//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::client::DEFAULT_API_ROOT_URL;
use crate::saclient::Credentials;

/// Sakura Cloud settings derived from environment variables and
/// configuration files.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "SAKURA")]
pub struct SakuraConfig {
    /// API access token. This value is required.
    pub access_token: String,
    /// API access token secret. This value is required.
    pub access_token_secret: String,
    /// Root URL of the zone API. Defaults to the `tk1b` zone.
    #[ortho_config(default = DEFAULT_API_ROOT_URL.to_owned())]
    pub api_root_url: String,
    /// Per-request timeout in seconds. The HTTP handle's default applies when
    /// unset.
    pub timeout_secs: Option<u64>,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl SakuraConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [sakura] in .sakura.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("dedicated-storage")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty,
    /// and [`ConfigError::InvalidTimeout`] when the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.access_token,
            &FieldMetadata::new(
                "Sakura Cloud access token",
                "SAKURA_ACCESS_TOKEN",
                "access_token",
            ),
        )?;
        Self::require_field(
            &self.access_token_secret,
            &FieldMetadata::new(
                "Sakura Cloud access token secret",
                "SAKURA_ACCESS_TOKEN_SECRET",
                "access_token_secret",
            ),
        )?;
        Self::require_field(
            &self.api_root_url,
            &FieldMetadata::new("API root URL", "SAKURA_API_ROOT_URL", "api_root_url"),
        )?;
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Credential pair for basic authentication.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.access_token.trim(),
            self.access_token_secret.trim(),
        )
    }

    /// Configured per-request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Raised when the timeout is set to zero seconds.
    #[error("SAKURA_TIMEOUT_SECS must be greater than zero")]
    InvalidTimeout,
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

