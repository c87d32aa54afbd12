//! TOML-based application configuration.
//!
//! Holds everything a sync run needs to know up front:
//! - Which Google Fit data source to read and how to scale it
//! - Which Habitica task to score
//! - Where credential, token and log files live
//! - API base URLs and the optional error-reporting webhook
//!
//! Configuration is stored at `~/.config/fitsync/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{base_dir, data_dir};
use crate::error::{ConfigError, Result};
use crate::replay::SuccessPolicy;

/// Locations of the local credential files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialPaths {
    /// Google OAuth client secret (`client_secret.json`).
    #[serde(default = "default_client_secret_path")]
    pub client_secret: PathBuf,
    /// Habitica `x-api-key` / `x-api-user` file.
    #[serde(default = "default_habitica_path")]
    pub habitica: PathBuf,
    /// Cached OAuth tokens, rewritten after refresh.
    #[serde(default = "default_token_cache_path")]
    pub token_cache: PathBuf,
}

/// API base URLs. Overridable so tests can point at a local server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_fitness_endpoint")]
    pub fitness: String,
    #[serde(default = "default_habitica_endpoint")]
    pub habitica: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthSettings {
    /// Localhost port the consent-flow callback listens on.
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorReportingConfig {
    /// Webhook receiving summary and error messages. Unset disables reporting.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/fitsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_source_id")]
    pub data_source_id: String,
    #[serde(default = "default_step_divisor")]
    pub step_divisor: u64,
    #[serde(default = "default_task_name")]
    pub task_name: String,
    #[serde(default)]
    pub success_policy: SuccessPolicy,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    #[serde(default)]
    pub credentials: CredentialPaths,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub oauth: OAuthSettings,
    #[serde(default)]
    pub error_reporting: ErrorReportingConfig,
}

// Default functions
fn default_data_source_id() -> String {
    "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps".into()
}
fn default_step_divisor() -> u64 {
    1000
}
fn default_task_name() -> String {
    "1000 steps".into()
}
fn default_log_path() -> PathBuf {
    base_dir().join("fitsync.log")
}
fn default_client_secret_path() -> PathBuf {
    base_dir().join("client_secret.json")
}
fn default_habitica_path() -> PathBuf {
    base_dir().join("habitica.json")
}
fn default_token_cache_path() -> PathBuf {
    base_dir().join("token.json")
}
fn default_fitness_endpoint() -> String {
    "https://www.googleapis.com/fitness/v1".into()
}
fn default_habitica_endpoint() -> String {
    "https://habitica.com/api/v3".into()
}
fn default_redirect_port() -> u16 {
    19822
}

impl Default for CredentialPaths {
    fn default() -> Self {
        Self {
            client_secret: default_client_secret_path(),
            habitica: default_habitica_path(),
            token_cache: default_token_cache_path(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            fitness: default_fitness_endpoint(),
            habitica: default_habitica_endpoint(),
        }
    }
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            redirect_port: default_redirect_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source_id: default_data_source_id(),
            step_divisor: default_step_divisor(),
            task_name: default_task_name(),
            success_policy: SuccessPolicy::default(),
            log_path: default_log_path(),
            credentials: CredentialPaths::default(),
            endpoints: EndpointsConfig::default(),
            oauth: OAuthSettings::default(),
            error_reporting: ErrorReportingConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of `config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `path` (or the default location). A missing file yields the
    /// defaults, which are written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation, or if the default config cannot be written.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };
        let cfg = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save(&path)?;
                cfg
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                }
                .into())
            }
        };
        Ok(cfg)
    }

    /// Parse and validate TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject values a run cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.step_divisor == 0 {
            return Err(invalid("step_divisor", "must be greater than zero"));
        }
        if self.task_name.trim().is_empty() {
            return Err(invalid("task_name", "must not be empty"));
        }
        if self.data_source_id.trim().is_empty() {
            return Err(invalid("data_source_id", "must not be empty"));
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }
}

fn invalid(key: &str, message: &str) -> crate::error::CoreError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
    .into()
}
