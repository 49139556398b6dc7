use anyhow::Result;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::email::Email;
use crate::error::SweepError;
use crate::mail::MailProvider;

/// Fetch the window of `max_results` emails that follows the newest `skip`.
/// Raising `stop` ends the fetch before the next message; what was fetched
/// so far is returned.
pub fn fetch(
    provider: &dyn MailProvider,
    max_results: usize,
    skip: usize,
    stop: &AtomicBool,
) -> Result<Vec<Email>> {
    if max_results == 0 {
        anyhow::bail!("max_results must be at least 1");
    }

    let ids = provider
        .list_message_ids(max_results + skip)
        .map_err(|e| SweepError::Fetch(format!("{e:#}")))?;

    let window: Vec<String> = ids.into_iter().skip(skip).take(max_results).collect();
    info!("fetching {} emails (skipping {skip})", window.len());

    let mut out = Vec::with_capacity(window.len());
    for id in window {
        if stop.load(Ordering::SeqCst) {
            info!("fetch stopped after {} emails", out.len());
            break;
        }
        let email = provider
            .get_message(&id)
            .map_err(|e| SweepError::Fetch(format!("{id}: {e:#}")))?;
        debug!("fetched {id}: {}", email.subject);
        out.push(email);
    }
    Ok(out)
}
