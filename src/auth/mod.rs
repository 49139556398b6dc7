//! Google OAuth2 for the Gmail API.
//!
//! Access tokens are cached on disk with their expiry; the refresh token and
//! the optional client secret live in the OS keyring.

pub mod oauth;
pub mod token_manager;
pub mod token_store;
pub mod tokens_file;

/// Full mailbox scope; permanent deletion is refused under `gmail.modify`.
pub const GMAIL_SCOPE: &str = "https://mail.google.com/";
