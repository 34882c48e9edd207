//! DevPayr SDK configuration.

use crate::DevpayrError;
use std::path::PathBuf;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.devpayr.com/api/v1/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for DevPayr runtime validation.
///
/// Construct with struct-update syntax over [`Config::default`] and pass
/// to [`crate::RuntimeValidator::new`], which validates it. Either
/// `license` or `api_key` must be set.
#[derive(Debug, Clone)]
pub struct Config {
    /// License key for license-mode validation. The license doubles as the
    /// secret used to decrypt injectables and verify their signatures.
    pub license: Option<String>,

    /// API key for project-scoped access (api-key mode).
    pub api_key: Option<String>,

    /// API base URL. A trailing slash is ensured by `validate`.
    pub base_url: String,

    /// When false, a same-day cache entry short-circuits validation with
    /// no network call.
    pub recheck: bool,

    /// Whether injectable delivery is enabled at all.
    pub injectables: bool,

    /// Whether to verify injectable signatures when present.
    pub injectables_verify: bool,

    /// Base directory injectables are written under.
    /// Defaults to the system temp dir when unset.
    pub injectables_path: Option<PathBuf>,

    /// When true, an injectable without a `target_path` is rejected
    /// instead of falling back to `<slug>.txt`.
    pub injectables_strict: bool,

    /// When true, the validator auto-processes injectables after a
    /// successful payment check.
    pub handle_injectables: bool,

    /// Request timeout in seconds for remote calls.
    pub timeout_secs: u64,

    /// Page size hint for list endpoints.
    pub per_page: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            license: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            recheck: true,
            injectables: true,
            injectables_verify: true,
            injectables_path: None,
            injectables_strict: false,
            handle_injectables: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            per_page: None,
        }
    }
}

impl Config {
    /// Validate configuration and normalize the base URL.
    pub fn validate(&mut self) -> Result<(), DevpayrError> {
        if self.license.as_deref().map_or(true, str::is_empty)
            && self.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(DevpayrError::ConfigError(
                "either \"license\" or \"api_key\" must be provided".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(DevpayrError::ConfigError(
                "base_url cannot be empty".to_string(),
            ));
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        Ok(())
    }

    /// Whether a license key is the trust credential.
    pub fn is_license_mode(&self) -> bool {
        self.license.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// Whether an API key is the trust credential.
    pub fn is_api_key_mode(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The active credential (license preferred over api_key).
    pub fn auth_credential(&self) -> Option<&str> {
        self.license
            .as_deref()
            .filter(|l| !l.is_empty())
            .or(self.api_key.as_deref().filter(|k| !k.is_empty()))
    }
}
