use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ClientError;

/// Base name of the optional config file (`cryptofolio.toml`).
pub const CONFIG_FILE: &str = "cryptofolio";

/// Prefix of the environment overrides, e.g. `CRYPTOFOLIO_API_URL`.
pub const ENV_PREFIX: &str = "CRYPTOFOLIO";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOKEN_KEY: &str = "token";
const DEFAULT_TOKEN_PATH: &str = ".cryptofolio/session.json";

/// Client settings: where the ledger lives, how long to wait for it, and
/// where the session credential is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the ledger service.
    pub api_url: String,

    /// Per-request timeout in seconds. `0` disables it.
    pub request_timeout_secs: u64,

    /// Storage key of the persisted token.
    pub token_key: String,

    /// Backing file for the file token store (native hosts).
    pub token_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
        }
    }
}

impl ClientConfig {
    /// Defaults, then `cryptofolio.toml` if present, then `CRYPTOFOLIO_*`
    /// environment variables.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, ClientError> {
        Self::from_sources(Some(CONFIG_FILE), Some(ENV_PREFIX), &[])
    }

    /// Build a config from explicit sources. Later sources win; `overrides`
    /// win over everything.
    pub fn from_sources(
        file: Option<&str>,
        env_prefix: Option<&str>,
        overrides: &[(&str, &str)],
    ) -> Result<Self, ClientError> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("token_key", defaults.token_key)?
            .set_default("token_path", DEFAULT_TOKEN_PATH)?;

        if let Some(name) = file {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(config::Environment::with_prefix(prefix).try_parsing(true));
        }
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: ClientConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the client cannot work with.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("Invalid api_url '{}': {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "api_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.token_key.trim().is_empty() {
            return Err(ClientError::Config("token_key must not be empty".into()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
