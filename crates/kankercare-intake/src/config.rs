//! Pipeline configuration
//!
//! Loaded from `~/.kankercare/config.toml` (or `config.<profile>.toml`).
//! Every section has defaults so a missing file yields a usable config; the
//! external endpoints stay unset until configured.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::rate_limit::RateLimitConfig;

const CONFIG_DIR: &str = ".kankercare";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub webhook: WebhookConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub limits: LimitsConfig,
    pub auth: AuthConfig,
}

/// Workflow webhook endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: Option<String>,
    /// Unset means the HTTP client's own default applies
    pub timeout_secs: Option<u64>,
}

/// Document database (Firebase Realtime Database REST endpoint)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub auth: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Where the file-backed secure store lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub login: RateLimitConfig,
    pub register: RateLimitConfig,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            login: RateLimitConfig::LOGIN,
            register: RateLimitConfig::REGISTER,
        }
    }
}

/// Mock authentication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub simulated_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { simulated_delay_ms: 1500 }
    }
}

impl AuthConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

impl IntakeConfig {
    /// Load the profile's config file, falling back to defaults when absent
    pub fn load(profile: Option<&str>) -> ConfigResult<Self> {
        let path = Self::config_path(profile)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> ConfigResult<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path(profile: Option<&str>) -> ConfigResult<PathBuf> {
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(Self::home_dir()?.join(filename))
    }

    /// Directory for the file-backed secure store
    pub fn storage_dir(&self) -> ConfigResult<PathBuf> {
        match &self.storage.dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::home_dir(),
        }
    }

    pub fn webhook_url(&self) -> ConfigResult<Option<Url>> {
        parse_url("webhook.url", self.webhook.url.as_deref())
    }

    pub fn database_url(&self) -> ConfigResult<Option<Url>> {
        parse_url("database.url", self.database.url.as_deref())
    }

    fn home_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(CONFIG_DIR))
    }
}

fn parse_url(field: &'static str, raw: Option<&str>) -> ConfigResult<Option<Url>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => Url::parse(s)
            .map(Some)
            .map_err(|e| ConfigError::InvalidUrl { field, reason: e.to_string() }),
    }
}
