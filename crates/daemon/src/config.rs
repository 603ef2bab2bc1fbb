//! Layered configuration
//!
//! Sources, later ones win:
//! 1. built-in defaults (`ScoutConfig::default()`)
//! 2. `scout.toml` in the working directory, or the file named by `SCOUT_CONFIG`
//! 3. environment variables `SCOUT__<SECTION>__<KEY>`
//!    (e.g. `SCOUT__SUPERVISOR__GRACE_PERIOD_SECS=2`)
//!
//! Provider credentials are not part of this file; adapters read them from
//! the plain environment at startup (see [`required_env`]).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "SCOUT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "scout.toml";
const ENV_PREFIX: &str = "SCOUT";
const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub log: LogSettings,
    pub supervisor: SupervisorSettings,
    pub endpoints: EndpointSettings,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Directory for `{process}.log` files (tilde-expanded)
    pub dir: String,
    pub format: LogFormat,
    /// Also log to stdout
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            format: LogFormat::Pretty,
            console: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessMode {
    /// Sleep `readiness_delay_secs`
    #[default]
    Delay,
    /// Poll each service's `/health` until `probe_timeout_secs`
    Probe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorSettings {
    pub readiness_delay_secs: u64,
    pub grace_period_secs: u64,
    pub readiness: ReadinessMode,
    pub probe_timeout_secs: u64,
    /// Where the Scout executables live; defaults to the supervisor's own directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<String>,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            readiness_delay_secs: 10,
            grace_period_secs: 5,
            readiness: ReadinessMode::Delay,
            probe_timeout_secs: 30,
            bin_dir: None,
        }
    }
}

impl SupervisorSettings {
    pub fn readiness_delay(&self) -> Duration {
        Duration::from_secs(self.readiness_delay_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn bin_dir(&self) -> Option<PathBuf> {
        self.bin_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned()))
    }
}

/// Listen addresses (`host:port`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub proxy: String,
    pub reddit: String,
    pub twitter: String,
    pub web_search: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            proxy: "127.0.0.1:8000".to_string(),
            reddit: "127.0.0.1:8001".to_string(),
            twitter: "127.0.0.1:8002".to_string(),
            web_search: "127.0.0.1:8003".to_string(),
        }
    }
}

/// `host:port` to a base URL; full URLs pass through
pub fn base_url(addr: &str) -> String {
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.trim_end_matches('/').to_string()
    } else {
        format!("http://{addr}")
    }
}

/// Third-party API base URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub reddit_auth_url: String,
    pub reddit_api_base: String,
    pub twitter_api_base: String,
    pub serpapi_base: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            reddit_auth_url: scout_infra_http::reddit_client::DEFAULT_AUTH_URL.to_string(),
            reddit_api_base: scout_infra_http::reddit_client::DEFAULT_API_BASE.to_string(),
            twitter_api_base: scout_infra_http::twitter_client::DEFAULT_API_BASE.to_string(),
            serpapi_base: scout_infra_http::serpapi_client::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ScoutConfig {
    /// Load from the default file location and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let (path, required) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => (shellexpand::tilde(&path).into_owned(), true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };
        Self::load_from(Path::new(&path), required, None)
    }

    /// Load with an explicit file and, optionally, an explicit environment map
    /// instead of the process environment
    pub fn load_from(
        path: &Path,
        required: bool,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&ScoutConfig::default())?)
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Read a credential from the environment; empty counts as missing
pub fn required_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}
