//! File-backed OAuth token storage.
//!
//! Read once at the start of a run and rewritten only after a refresh or a
//! fresh consent flow. Runs never overlap, so there is no locking.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::integrations::oauth::OAuthTokens;

#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached tokens, or `None` if nothing is stored or the file is unreadable
    /// as tokens. A corrupt cache is treated like an empty one so the caller
    /// falls back to the consent flow.
    pub fn load(&self) -> Option<OAuthTokens> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Ignoring unreadable token cache: {e}");
                None
            }
        }
    }

    pub fn store(&self, tokens: &OAuthTokens) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&self.path, json).map_err(|e| save_failed(e.to_string()))?;
        tracing::info!("Storing credentials to {}", self.path.display());
        Ok(())
    }

    /// Remove the cache file. Missing files are not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tokens() -> OAuthTokens {
        OAuthTokens {
            access_token: "ya29.token".into(),
            refresh_token: Some("1//refresh".into()),
            expires_at: Some(1_700_000_000),
            token_type: "Bearer".into(),
            scope: None,
        }
    }

    #[test]
    fn store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("sub").join("token.json"));
        assert!(cache.load().is_none());

        cache.store(&sample_tokens()).unwrap();
        let loaded = cache.load().unwrap();
        assert_eq!(loaded.access_token, "ya29.token");
        assert_eq!(loaded.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[test]
    fn corrupt_cache_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(TokenCache::new(&path).load().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));
        cache.store(&sample_tokens()).unwrap();
        cache.clear().unwrap();
        cache.clear().unwrap();
        assert!(cache.load().is_none());
    }
}
