mod config;
pub mod token_cache;

pub use config::{
    Config, CredentialPaths, EndpointsConfig, ErrorReportingConfig, OAuthSettings,
};
pub use token_cache::TokenCache;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/fitsync[-dev]/` based on FITSYNC_ENV, without creating it.
///
/// Set FITSYNC_ENV=dev to use the development data directory.
pub fn base_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FITSYNC_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("fitsync-dev")
    } else {
        base_dir.join("fitsync")
    }
}

/// Like [`base_dir`], creating the directory if needed.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = base_dir();
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
