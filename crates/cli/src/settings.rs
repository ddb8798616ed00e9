//! Layered configuration: optional TOML file, then environment.

use anyhow::{bail, Context, Result};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use steamcheck_profile::DEFAULT_PLAYTIME_APP_ID;
use steamcheck_sdk::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "steamcheck.toml";

/// Overrides for the process environment, used by tests.
pub type EnvSource = config::Map<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => bail!("unknown log format '{other}' (expected 'pretty' or 'compact')"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Upstream Web API credential (`STEAM_API_KEY`)
    pub api_key: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub playtime_app_id: u32,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("playtime_app_id", &self.playtime_app_id)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    pub fn load(config_path_override: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path_override, None)
    }

    /// Load configuration, reading environment variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        config_path_override: Option<&Path>,
        env: Option<EnvSource>,
    ) -> Result<Self> {
        let resolved_path = if let Some(path) = config_path_override {
            if !path.exists() {
                bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            Some(path.to_path_buf())
        } else {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                Some(path)
            } else {
                None
            }
        };

        let mut builder = Config::builder();

        if let Some(path) = &resolved_path {
            builder = builder.add_source(ConfigFile::from(path.as_path()));
        }

        builder = builder
            .add_source(Environment::with_prefix("STEAMCHECK").source(env.clone()))
            .add_source(Environment::with_prefix("STEAM").source(env));

        let config = builder.build().context("failed to load configuration")?;

        let api_key = get_value::<String>(&config, "api_key")?
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let Some(api_key) = api_key else {
            bail!("STEAM_API_KEY must be set in the environment");
        };

        let api_base_url = get_value::<String>(&config, "api_base_url")?
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let request_timeout = match get_value::<u64>(&config, "request_timeout_secs")? {
            Some(0) => bail!("request_timeout_secs must be greater than zero"),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let playtime_app_id =
            get_value::<u32>(&config, "playtime_app_id")?.unwrap_or(DEFAULT_PLAYTIME_APP_ID);

        let log_level =
            get_value::<String>(&config, "log_level")?.unwrap_or_else(|| "info".to_string());

        let log_format = match get_value::<String>(&config, "log_format")? {
            Some(value) => LogFormat::parse(&value)?,
            None => LogFormat::Compact,
        };

        Ok(Self {
            api_key,
            api_base_url,
            request_timeout,
            playtime_app_id,
            log_level,
            log_format,
        })
    }
}

fn get_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("invalid configuration value for '{key}'")),
    }
}
