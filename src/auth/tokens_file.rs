use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::config_dir;

/// Seconds shaved off the provider's expiry so a token is never used right at
/// the edge of its lifetime.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Non-secret access token cache stored in ~/.config/inboxpert/tokens.json
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at_epoch: i64,
}

impl CachedToken {
    pub fn new(access_token: String, now: i64, expires_in: Option<u64>) -> Self {
        // Google access tokens live for an hour when the response omits it
        let lifetime = expires_in.map(|s| s as i64).unwrap_or(3600);
        Self {
            access_token,
            expires_at_epoch: now + lifetime - EXPIRY_MARGIN_SECS,
        }
    }

    pub fn is_fresh(&self, now: i64) -> bool {
        now < self.expires_at_epoch
    }
}

pub fn tokens_path() -> Result<PathBuf> {
    let p = config_dir()?;
    fs::create_dir_all(&p)?;
    Ok(p.join("tokens.json"))
}

pub fn save_token(path: &Path, token: &CachedToken) -> Result<()> {
    let s = serde_json::to_string_pretty(token)?;
    fs::write(path, s)?;
    Ok(())
}

/// A missing or unreadable cache is treated as empty.
pub fn load_token(path: &Path) -> Option<CachedToken> {
    let s = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&s) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("ignoring unreadable token cache {}: {e}", path.display());
            None
        }
    }
}
