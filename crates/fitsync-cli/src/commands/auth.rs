use clap::Subcommand;
use fitsync_core::credentials::ClientSecret;
use fitsync_core::integrations::oauth::{self, OAuthConfig};
use fitsync_core::TokenCache;

use super::{runtime, GlobalOpts};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Run the browser consent flow and cache the token
    Login,
    /// Delete the cached token
    Logout,
    /// Check whether a token is cached
    Status,
}

pub fn run(opts: &GlobalOpts, action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, _guard) = opts.load_with_logging()?;
    let cache = TokenCache::new(&config.credentials.token_cache);

    match action {
        AuthAction::Login => {
            let secret = ClientSecret::load(&config.credentials.client_secret)?;
            let oauth_config = OAuthConfig::for_fitness(&secret, config.oauth.redirect_port);
            runtime()?.block_on(oauth::authorize(&oauth_config, &cache))?;
            println!("Google Fit authenticated");
        }
        AuthAction::Logout => {
            cache.clear()?;
            println!("Google Fit disconnected");
        }
        AuthAction::Status => {
            let status = match cache.load() {
                None => "not authenticated",
                Some(tokens) if !oauth::is_expired(&tokens) => "authenticated",
                Some(tokens) if tokens.refresh_token.is_some() => {
                    "authenticated (token expired, will refresh)"
                }
                Some(_) => "token expired, run `fitsync auth login`",
            };
            println!("{status}");
        }
    }
    Ok(())
}
