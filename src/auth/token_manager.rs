use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::tokens_file::{self, CachedToken};
use crate::auth::{GMAIL_SCOPE, oauth, token_store};
use crate::config::{Config, DEFAULT_REDIRECT_URI};
use crate::error::SweepError;

#[derive(Clone)]
pub struct TokenManager {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub user_email: String,
}

impl TokenManager {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let user_email = cfg
            .user_email
            .clone()
            .ok_or_else(|| anyhow!("user_email not set in config"))?;
        let redirect_uri = cfg
            .redirect_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

        let client_secret = token_store::load_client_secret(&cfg.client_id)?
            .or_else(|| std::env::var("OAUTH_CLIENT_SECRET").ok());

        Ok(Self {
            client_id: cfg.client_id.clone(),
            client_secret,
            redirect_uri,
            user_email,
        })
    }

    /// Returns a valid access token: cached, refreshed, or from a fresh
    /// consent flow, in that order. Failure maps to `SweepError::Auth`.
    pub fn get_access_token(&self) -> Result<String> {
        self.acquire()
            .map_err(|e| SweepError::Auth(format!("{e:#}")).into())
    }

    fn acquire(&self) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;
        let cache_path = tokens_file::tokens_path()?;

        if let Some(cached) = tokens_file::load_token(&cache_path)
            && cached.is_fresh(now)
        {
            debug!("using cached access token");
            return Ok(cached.access_token);
        }

        let secret = self.client_secret.as_deref();
        let tokens = match token_store::load_refresh_token(&self.user_email)? {
            Some(rt) => match oauth::refresh_access_token(&self.client_id, secret, &rt) {
                Ok(t) => {
                    info!("refreshed access token for {}", self.user_email);
                    t
                }
                Err(e) => {
                    warn!("refresh failed ({e}); falling back to interactive consent");
                    self.consent()?
                }
            },
            None => {
                info!("no refresh token stored; running interactive consent");
                self.consent()?
            }
        };

        if let Some(rt) = &tokens.refresh_token
            && let Err(e) = token_store::save_refresh_token(&self.user_email, rt)
        {
            warn!("couldn't save refresh token to keyring: {e}");
        }

        let cached = CachedToken::new(tokens.access_token, now, tokens.expires_in);
        if let Err(e) = tokens_file::save_token(&cache_path, &cached) {
            warn!("couldn't cache access token: {e}");
        }
        Ok(cached.access_token)
    }

    fn consent(&self) -> Result<oauth::Tokens> {
        oauth::perform_pkce_flow(
            &self.client_id,
            self.client_secret.as_deref(),
            &self.redirect_uri,
            GMAIL_SCOPE,
        )
    }
}
