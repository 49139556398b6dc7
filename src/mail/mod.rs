pub mod decoders;
pub mod fetcher;
pub mod gmail;

use anyhow::Result;

use crate::domain::email::Email;

/// Remote mailbox operations the scanner and the cleanup actions need.
pub trait MailProvider {
    /// Up to `limit` message ids, newest first.
    fn list_message_ids(&self, limit: usize) -> Result<Vec<String>>;
    fn get_message(&self, id: &str) -> Result<Email>;
    fn trash_message(&self, id: &str) -> Result<()>;
    /// Irreversible.
    fn delete_message(&self, id: &str) -> Result<()>;
}
