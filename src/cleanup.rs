//! Bulk trash / delete of flagged emails.

use anyhow::Result;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::email::{DeleteMode, EmailId};
use crate::error::SweepError;
use crate::mail::MailProvider;
use crate::review::Review;

/// Apply `mode` to each id in order, recording successes in `done`. Stops at
/// the first provider error, or quietly once `stop` is raised.
fn apply(
    provider: &dyn MailProvider,
    ids: &[EmailId],
    mode: DeleteMode,
    stop: Option<&AtomicBool>,
    done: &mut Vec<EmailId>,
) -> Result<()> {
    for id in ids {
        if stop.is_some_and(|s| s.load(Ordering::SeqCst)) {
            info!("{} stopped by user", mode.label());
            break;
        }
        let res = match mode {
            DeleteMode::Trash => provider.trash_message(id),
            DeleteMode::PermanentDelete => provider.delete_message(id),
        };
        if let Err(e) = res {
            warn!("{} failed for {id}: {e:#}", mode.label());
            return Err(SweepError::Deletion {
                id: id.clone(),
                processed: done.len(),
                reason: format!("{e:#}"),
            }
            .into());
        }
        done.push(id.clone());
    }
    Ok(())
}

fn apply_and_forget(
    provider: &dyn MailProvider,
    review: &mut Review,
    ids: Vec<EmailId>,
    mode: DeleteMode,
    stop: Option<&AtomicBool>,
) -> Result<usize> {
    let mut done = Vec::with_capacity(ids.len());
    let res = apply(provider, &ids, mode, stop, &mut done);
    // processed emails are gone on the provider side even if a later one failed
    review.remove(&done);
    info!("{}: {} of {} emails", mode.label(), done.len(), ids.len());
    res.map(|_| done.len())
}

/// Act on the current selection; returns how many emails were processed.
pub fn delete_selected(
    provider: &dyn MailProvider,
    review: &mut Review,
    mode: DeleteMode,
) -> Result<usize> {
    let ids = review.selected_ids();
    apply_and_forget(provider, review, ids, mode, None)
}

/// Lucky mode: trash every flagged email without review. Raising `stop` ends
/// the run before the next email; the count covers what was trashed.
pub fn trash_all(
    provider: &dyn MailProvider,
    review: &mut Review,
    stop: &AtomicBool,
) -> Result<usize> {
    let ids = review.results().iter().map(|e| e.id.clone()).collect();
    apply_and_forget(provider, review, ids, DeleteMode::Trash, Some(stop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMailbox, emails};
    use std::sync::Arc;

    #[test]
    fn lucky_mode_trashes_every_match() {
        let mailbox = FakeMailbox::with_count(10);
        let mut review = Review::new(vec![emails(10)[2].clone(), emails(10)[7].clone()]);

        assert_eq!(trash_all(&mailbox, &mut review, &AtomicBool::new(false)).unwrap(), 2);
        assert_eq!(*mailbox.trashed.borrow(), vec!["m2", "m7"]);
        assert!(mailbox.deleted.borrow().is_empty());
        assert!(review.is_empty());
    }

    #[test]
    fn stopped_lucky_run_keeps_the_rest() {
        let stop = Arc::new(AtomicBool::new(false));
        let mailbox = FakeMailbox::with_count(6).raise_after(2, stop.clone());
        let mut review = Review::new(emails(6));

        assert_eq!(trash_all(&mailbox, &mut review, &stop).unwrap(), 2);
        assert_eq!(*mailbox.trashed.borrow(), vec!["m0", "m1"]);
        let left: Vec<_> = review.results().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(left, ["m2", "m3", "m4", "m5"]);
    }

    #[test]
    fn deleting_one_leaves_the_rest_in_either_mode() {
        for mode in [DeleteMode::Trash, DeleteMode::PermanentDelete] {
            let mailbox = FakeMailbox::with_count(5);
            let mut review = Review::new(emails(5));
            review.toggle_one("m3", true);

            assert_eq!(delete_selected(&mailbox, &mut review, mode).unwrap(), 1);

            let left: Vec<_> = review.results().iter().map(|e| e.id.as_str()).collect();
            assert_eq!(left, ["m0", "m1", "m2", "m4"]);
            assert!(review.selection().is_empty());
            let touched = match mode {
                DeleteMode::Trash => mailbox.trashed.borrow().clone(),
                DeleteMode::PermanentDelete => mailbox.deleted.borrow().clone(),
            };
            assert_eq!(touched, vec!["m3"]);
        }
    }

    #[test]
    fn failure_stops_batch_but_forgets_processed() {
        let mailbox = FakeMailbox::with_count(5);
        mailbox.fail_action("m2");
        let mut review = Review::new(emails(5));
        review.toggle_select_all(true);

        let err = delete_selected(&mailbox, &mut review, DeleteMode::Trash).unwrap_err();

        match err.downcast_ref::<SweepError>() {
            Some(SweepError::Deletion { id, processed, .. }) => {
                assert_eq!(id, "m2");
                assert_eq!(*processed, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(*mailbox.trashed.borrow(), vec!["m0", "m1"]);
        let left: Vec<_> = review.results().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(left, ["m2", "m3", "m4"]);
        assert!(review.selection().is_empty());
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let mailbox = FakeMailbox::with_count(3);
        let mut review = Review::new(emails(3));
        assert_eq!(
            delete_selected(&mailbox, &mut review, DeleteMode::PermanentDelete).unwrap(),
            0
        );
        assert_eq!(review.len(), 3);
    }
}
