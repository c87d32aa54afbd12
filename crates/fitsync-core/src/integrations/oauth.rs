//! Lightweight OAuth2 Authorization Code flow for the Google Fit client.
//!
//! 1. Opens browser to authorization URL
//! 2. Starts a tiny localhost HTTP server to receive the callback
//! 3. Exchanges the code for an access token (+ refresh token)
//! 4. Stores tokens in the token cache file

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::TcpListener;

use crate::credentials::ClientSecret;
use crate::error::{OAuthError, Result};
use crate::storage::TokenCache;

pub const FITNESS_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/fitness.body.read",
    "https://www.googleapis.com/auth/fitness.activity.read",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>, // Unix timestamp
    pub token_type: String,
    pub scope: Option<String>,
}

/// Token endpoint response. Both the code exchange and the refresh grant
/// answer in this shape.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_tokens(self, previous_refresh: Option<&str>) -> std::result::Result<OAuthTokens, String> {
        if let Some(error) = self.error {
            return Err(match self.error_description {
                Some(desc) => format!("{error}: {desc}"),
                None => error,
            });
        }
        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or("missing access_token")?;
        let expires_at = self
            .expires_in
            .map(|ei| chrono::Utc::now().timestamp() + ei);

        Ok(OAuthTokens {
            access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(String::from)),
            expires_at,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".into()),
            scope: self.scope,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
}

impl OAuthConfig {
    /// Build a config for the fitness scopes from a downloaded client secret.
    pub fn for_fitness(secret: &ClientSecret, redirect_port: u16) -> Self {
        Self {
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            auth_url: secret.auth_uri.clone(),
            token_url: secret.token_uri.clone(),
            scopes: FITNESS_SCOPES.iter().map(|s| s.to_string()).collect(),
            redirect_port,
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }

    pub fn auth_url_full(&self) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.auth_url,
            encode(&self.client_id),
            encode(&self.redirect_uri()),
            encode(&scopes),
        )
    }
}

/// Return a usable access token: cached if still valid, refreshed if expired,
/// or obtained through the interactive consent flow when nothing usable is
/// cached.
pub async fn access_token(config: &OAuthConfig, cache: &TokenCache) -> Result<String> {
    let Some(tokens) = cache.load() else {
        tracing::info!("No cached credentials, starting consent flow");
        return Ok(authorize(config, cache).await?.access_token);
    };

    if !is_expired(&tokens) {
        return Ok(tokens.access_token);
    }

    match tokens.refresh_token.as_deref() {
        Some(refresh) => {
            tracing::debug!("Access token expired, refreshing");
            Ok(refresh_token(config, refresh, cache).await?.access_token)
        }
        None => {
            tracing::info!("Cached credentials expired without refresh token, starting consent flow");
            Ok(authorize(config, cache).await?.access_token)
        }
    }
}

/// Run the full OAuth2 flow: open browser -> listen for callback -> exchange code.
pub async fn authorize(config: &OAuthConfig, cache: &TokenCache) -> Result<OAuthTokens> {
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        return Err(OAuthError::CredentialsNotConfigured {
            service: "Google Fit".into(),
        }
        .into());
    }

    let auth_url = config.auth_url_full();
    tracing::info!("Open this URL to authorize fitsync: {auth_url}");
    if let Err(e) = open::that(&auth_url) {
        tracing::warn!("Could not open a browser: {e}");
    }

    // Listen for callback
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.redirect_port))?;
    listener.set_nonblocking(false)?;

    let (mut stream, _) = listener.accept()?;
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf)?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let code = match callback_code(&request) {
        Ok(code) => code,
        Err(e) => {
            let _ = stream.write_all(failure_page().as_bytes());
            return Err(e.into());
        }
    };

    stream.write_all(success_page().as_bytes())?;
    drop(stream);
    drop(listener);

    let tokens = exchange_code(config, &code).await?;
    cache.store(&tokens)?;

    Ok(tokens)
}

/// Exchange authorization code for tokens.
async fn exchange_code(config: &OAuthConfig, code: &str) -> Result<OAuthTokens> {
    let redirect_uri = config.redirect_uri();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri.as_str()),
    ];

    let body = post_token_form(&config.token_url, &params)
        .await
        .map_err(OAuthError::TokenExchangeFailed)?;

    Ok(body.into_tokens(None).map_err(OAuthError::TokenExchangeFailed)?)
}

/// Refresh an access token using a refresh token and rewrite the cache.
pub async fn refresh_token(
    config: &OAuthConfig,
    refresh: &str,
    cache: &TokenCache,
) -> Result<OAuthTokens> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh),
        ("grant_type", "refresh_token"),
    ];

    let body = post_token_form(&config.token_url, &params)
        .await
        .map_err(OAuthError::TokenRefreshFailed)?;

    let tokens = body
        .into_tokens(Some(refresh))
        .map_err(OAuthError::TokenRefreshFailed)?;
    cache.store(&tokens)?;

    Ok(tokens)
}

async fn post_token_form(
    token_url: &str,
    params: &[(&str, &str)],
) -> std::result::Result<TokenResponse, String> {
    Client::new()
        .post(token_url)
        .form(params)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json::<TokenResponse>()
        .await
        .map_err(|e| e.to_string())
}

/// Check if stored tokens are expired (with 60s buffer).
pub fn is_expired(tokens: &OAuthTokens) -> bool {
    is_expired_at(tokens, chrono::Utc::now().timestamp())
}

fn is_expired_at(tokens: &OAuthTokens, now: i64) -> bool {
    match tokens.expires_at {
        Some(exp) => now > exp - 60,
        None => false,
    }
}

fn extract_param(request: &str, name: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.to_string())
}

fn success_page() -> &'static str {
    "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body><h2>Authentication successful!</h2><p>You can close this tab.</p><script>window.close()</script></body></html>"
}

fn failure_page() -> &'static str {
    "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\n\r\n<html><body><h2>Authentication failed.</h2><p>Check the fitsync log for details.</p></body></html>"
}

/// The `code` carried by the consent redirect. A redirect with `error=` means
/// the user (or Google) refused consent.
fn callback_code(request: &str) -> Result<String, OAuthError> {
    if let Some(code) = extract_param(request, "code") {
        return Ok(code);
    }
    match extract_param(request, "error") {
        Some(reason) => Err(OAuthError::AuthorizationFailed(reason)),
        None => Err(OAuthError::InvalidCallback("no code in callback".into())),
    }
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
