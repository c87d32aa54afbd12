//! Core error types for fitsync-core.
//!
//! Errors that abort a run (authentication, dataset fetch, undecodable
//! responses) surface as [`CoreError`]. Recoverable conditions such as a
//! failed increment call never become errors; they are tallied instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fitsync-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration and credential file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// OAuth-related errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load a configuration or credential file
    #[error("Failed to load {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// OAuth-specific errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Consent was refused at the authorization endpoint
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid callback
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),

    /// Credentials not configured
    #[error("OAuth credentials not configured for {service}")]
    CredentialsNotConfigured { service: String },
}

/// Errors talking to Google Fit or Habitica.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request never produced a response
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Response carried a non-success status
    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    /// Response body was missing expected fields
    #[error("Malformed {service} response: {message}")]
    MalformedResponse {
        service: &'static str,
        message: String,
    },
}

impl ApiError {
    pub(crate) fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ApiError::Http { service, source }
    }

    pub(crate) fn malformed(service: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |err| ApiError::MalformedResponse {
            service,
            message: err.to_string(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
