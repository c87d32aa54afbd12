//! Local credential files: the Google client secret and the Habitica API keys.

use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Habitica API credentials, sent as the `x-api-key` / `x-api-user` headers.
#[derive(Debug, Clone, Deserialize)]
pub struct HabitCredentials {
    #[serde(rename = "x-api-key")]
    pub api_key: String,
    #[serde(rename = "x-api-user")]
    pub api_user: String,
}

impl HabitCredentials {
    pub fn load(path: &Path) -> Result<Self> {
        let creds: Self = read_json(path)?;
        if creds.api_key.is_empty() || creds.api_user.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "habitica credentials".into(),
                message: format!("empty x-api-key or x-api-user in {}", path.display()),
            }
            .into());
        }
        Ok(creds)
    }
}

/// OAuth client as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".into()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".into()
}

impl ClientSecret {
    /// Load an `installed` (desktop) or `web` client secret file.
    pub fn load(path: &Path) -> Result<Self> {
        let file: ClientSecretFile = read_json(path)?;
        file.installed.or(file.web).ok_or_else(|| {
            ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: "expected an \"installed\" or \"web\" client".into(),
            }
            .into()
        })
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| {
        ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}
