use crate::domain::value_objects::BackendName;
use serde::Deserialize;

pub const ASSET_BACKEND_ENV: &str = "NGINE_ASSET_BACKEND";
pub const ASSET_PATH_ENV: &str = "NGINE_ASSET_PATH";
pub const API_ENDPOINT_ENV: &str = "NGINE_API_ENDPOINT";
pub const CLOUD_URL_ENV: &str = "NGINE_CLOUD_URL";
pub const CATALOGUE_ENDPOINT_ENV: &str = "NGINE_CATALOGUE_ENDPOINT";
pub const CATALOGUE_TOKEN_ENV: &str = "NGINE_CATALOGUE_TOKEN";

pub const DEFAULT_ASSET_PATH: &str = "./assets";
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8080";
pub const DEFAULT_CLOUD_URL: &str = "https://assets.ngine.io";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    // Backend selection
    pub backend: Option<String>,

    // Local backend
    pub asset_path: String,
    pub api_endpoint: Option<String>,

    // Cloud backend
    pub cloud_base_url: String,

    // Privileged catalogue
    pub catalogue_endpoint: Option<String>,
    pub catalogue_token: Option<String>,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: None,
            asset_path: DEFAULT_ASSET_PATH.to_string(),
            api_endpoint: None,
            cloud_base_url: DEFAULT_CLOUD_URL.to_string(),
            catalogue_endpoint: None,
            catalogue_token: None,
            debug: false,
        }
    }
}

impl Config {
    /// Read every setting from the environment without validating it.
    pub fn from_env() -> Self {
        Self {
            backend: env_var(ASSET_BACKEND_ENV),
            asset_path: env_var(ASSET_PATH_ENV).unwrap_or_else(|| DEFAULT_ASSET_PATH.to_string()),
            api_endpoint: env_var(API_ENDPOINT_ENV),
            cloud_base_url: env_var(CLOUD_URL_ENV).unwrap_or_else(|| DEFAULT_CLOUD_URL.to_string()),
            catalogue_endpoint: env_var(CATALOGUE_ENDPOINT_ENV),
            catalogue_token: env_var(CATALOGUE_TOKEN_ENV),
            debug: std::env::var("DEBUG").is_ok(),
        }
    }

    /// Backend named by the environment, if it names a valid one.
    pub fn backend_name(&self) -> Option<BackendName> {
        self.backend.as_deref().and_then(BackendName::parse)
    }
}

/// Non-empty value of an environment variable.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn load_config() -> anyhow::Result<Config> {
    let cfg = Config::from_env();

    if let Some(backend) = &cfg.backend {
        if BackendName::parse(backend).is_none() {
            anyhow::bail!(
                "{}={} is not a valid backend (expected one of: {})",
                ASSET_BACKEND_ENV,
                backend,
                BackendName::valid_names().join(", ")
            );
        }
    }

    reqwest::Url::parse(&cfg.cloud_base_url).map_err(|e| {
        anyhow::anyhow!("{}={} is not a valid URL: {}", CLOUD_URL_ENV, cfg.cloud_base_url, e)
    })?;

    Ok(cfg)
}

/// Serializes tests that read or write process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
