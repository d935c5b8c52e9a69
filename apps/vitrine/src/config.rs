//! # Configuration
//!
//! `VitrineConfig` is read from a TOML file and then overridden by
//! environment variables:
//!
//! | variable | field |
//! |---|---|
//! | `VITRINE_PROVIDER` | `provider` (`local` or `remote`) |
//! | `VITRINE_REMOTE_URL` | `remote.url` |
//! | `VITRINE_API_KEY` | `server.api_key` and `remote.api_key` |
//! | `VITRINE_DB` | `database` |
//! | `VITRINE_CORS_ORIGINS` | `server.cors_origins` (comma-separated, or `*`) |
//! | `VITRINE_RATE_LIMIT` | `server.rate_limit` (requests/second, 0 disables) |
//!
//! Every section is optional; a missing file yields the defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use vitrine_core::ProviderKind;

/// File read when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "vitrine.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VitrineConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Member account created at server startup when absent.
    #[serde(default)]
    pub demo_member: Option<DemoMemberConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct RemoteConfig {
    /// Full endpoint URL, e.g. `http://127.0.0.1:8080/api`.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout. Unset means the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the multiplexed endpoint.
    #[serde(default = "default_route")]
    pub route: String,

    /// Bearer key required by mutating actions. Unset disables auth.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Allowed CORS origins. `["*"]` allows any; unset means localhost only.
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,

    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DemoMemberConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_plan")]
    pub plan: String,
    #[serde(default)]
    pub balance: f64,
}

fn default_database() -> PathBuf {
    PathBuf::from("vitrine.redb")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_route() -> String {
    "/api".to_string()
}

fn default_rate_limit() -> u32 {
    100
}

fn default_body_limit() -> usize {
    2 * 1024 * 1024
}

fn default_plan() -> String {
    "FREE".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            route: default_route(),
            api_key: None,
            cors_origins: None,
            rate_limit: default_rate_limit(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for VitrineConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            provider: ProviderKind::default(),
            remote: RemoteConfig::default(),
            server: ServerConfig::default(),
            demo_member: None,
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl VitrineConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path` (must exist) or, without a path, `vitrine.toml` if
    /// present. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(value) = get("VITRINE_PROVIDER") {
            self.provider = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "VITRINE_PROVIDER",
                value: value.clone(),
            })?;
        }
        if let Some(value) = get("VITRINE_REMOTE_URL") {
            self.remote.url = Some(value);
        }
        if let Some(value) = get("VITRINE_API_KEY") {
            self.server.api_key = Some(value.clone());
            self.remote.api_key = Some(value);
        }
        if let Some(value) = get("VITRINE_DB") {
            self.database = PathBuf::from(value);
        }
        if let Some(value) = get("VITRINE_CORS_ORIGINS") {
            self.server.cors_origins = Some(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        if let Some(value) = get("VITRINE_RATE_LIMIT") {
            self.server.rate_limit = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "VITRINE_RATE_LIMIT",
                value: value.clone(),
            })?;
        }
        Ok(())
    }
}
