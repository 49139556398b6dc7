use thiserror::Error;

/// Failures callers may want to tell apart. Everything else travels as a plain
/// `anyhow::Error`.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("deleting {id} failed after {processed} emails were processed: {reason}")]
    Deletion {
        id: String,
        processed: usize,
        reason: String,
    },

    #[error("search criteria is required")]
    InvalidCriterion,
}
