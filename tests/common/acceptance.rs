//! Shared setup for acceptance tests against the live API.
//!
//! Integration tests are compiled as separate crates (one per top-level file in
//! `tests/`). Keeping this helper under `tests/common/` avoids an extra test
//! binary while still allowing reuse via:
//!
//! ```rust
//! #[path = "common/acceptance.rs"]
//! mod acceptance;
//! ```

use std::env;

use dedicated_storage::apis::v1;
use dedicated_storage::{SakuraConfig, new_client_with_api_root_url, saclient};

/// Environment variable that opts into acceptance runs when set to `1`.
pub const ACCEPTANCE_FLAG: &str = "TESTACC";

/// Credentials every acceptance test needs.
pub const CREDENTIAL_VARS: [&str; 2] = ["SAKURA_ACCESS_TOKEN", "SAKURA_ACCESS_TOKEN_SECRET"];

/// Disk used by the disk acceptance tests. The `SAKURACLOUD_` spelling is
/// the name older provider test suites export.
pub const DISK_ID_VAR: &[&str] = &["SAKURA_DISK_ID", "SAKURACLOUD_DISK_ID"];

/// Existing contract used by pool and snapshot acceptance tests.
pub const CONTRACT_ID_VAR: &[&str] = &[
    "SAKURA_DEDICATED_STORAGE_ID",
    "SAKURACLOUD_DEDICATED_STORAGE_ID",
];

/// First non-blank value among `names`, in order.
pub fn env_value(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    })
}

/// Builds a client bound to the configured zone, or `None` when acceptance
/// runs are not enabled or any of `required` (beyond the credentials) is
/// unset. Each entry of `required` lists accepted names for one variable.
pub fn live_client(required: &[&[&str]]) -> Option<v1::Client> {
    if env::var(ACCEPTANCE_FLAG).as_deref() != Ok("1") {
        return None;
    }
    let credentials_set = CREDENTIAL_VARS
        .iter()
        .all(|name| env_value(&[*name]).is_some());
    if !credentials_set || !required.iter().all(|names| env_value(names).is_some()) {
        return None;
    }

    let config = SakuraConfig::load_without_cli_args()
        .unwrap_or_else(|err| panic!("acceptance configuration should load: {err}"));
    config
        .validate()
        .unwrap_or_else(|err| panic!("acceptance configuration should be valid: {err}"));
    let http = saclient::Client::from_config(&config)
        .unwrap_or_else(|err| panic!("HTTP handle should build: {err}"));
    Some(
        new_client_with_api_root_url(&http, &config.api_root_url)
            .unwrap_or_else(|err| panic!("API client should build: {err}")),
    )
}

/// Reads a numeric resource ID from the first of `names` that is set.
pub fn id_from_env(names: &[&str]) -> i64 {
    env_value(names)
        .unwrap_or_else(|| panic!("one of {names:?} should be set"))
        .parse()
        .unwrap_or_else(|err| panic!("{names:?} should hold a numeric ID: {err}"))
}

/// Name for a resource created by one acceptance run.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
