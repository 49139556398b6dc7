//! The fetch -> classify loop with cooperative cancellation.

pub mod progress;

use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::email::{Criterion, Email};
use crate::llm::Classifier;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Scanning,
    Completed,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct ScanState {
    pub phase: ScanPhase,
    pub total_scanned: usize,
    pub requested: usize,
    /// Model calls that failed and were counted as non-matches.
    pub classification_errors: usize,
    cancel: Arc<AtomicBool>,
}

impl ScanState {
    pub(crate) fn begin(&mut self, requested: usize) {
        self.phase = ScanPhase::Scanning;
        self.total_scanned = 0;
        self.requested = requested;
        self.classification_errors = 0;
    }

    /// Shared flag a signal handler can raise to stop the scan before its
    /// next email.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// Published after every decision.
#[derive(Debug)]
pub struct ScanProgress<'a> {
    pub scanned: usize,
    pub requested: usize,
    pub found: usize,
    pub email: &'a Email,
    pub matched: bool,
    /// Model output after its reasoning; empty when the call failed.
    pub verdict: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    pub scanned: usize,
    pub found: usize,
    pub cancelled: bool,
    pub classification_errors: usize,
}

pub trait ScanObserver {
    fn started(&mut self, _requested: usize) {}
    fn progress(&mut self, update: &ScanProgress<'_>);
    fn finished(&mut self, _outcome: &ScanOutcome) {}
}

/// Observer for callers that don't display anything.
pub struct Silent;

impl ScanObserver for Silent {
    fn progress(&mut self, _update: &ScanProgress<'_>) {}
}

/// Classify `emails` in order, collecting matches into `session.review`.
pub fn run_scan(
    session: &mut Session,
    emails: Vec<Email>,
    criterion: &Criterion,
    classifier: &Classifier<'_>,
    observer: &mut dyn ScanObserver,
) -> ScanOutcome {
    session.begin_scan(emails.len());
    observer.started(emails.len());
    info!("scanning {} emails for {:?}", emails.len(), criterion.as_str());

    for email in emails {
        if session.scan.cancel_requested() {
            session.scan.phase = ScanPhase::Cancelled;
            break;
        }

        let (matched, verdict) = match classifier.classify(&email, criterion) {
            Ok(c) => (c.matched, c.verdict),
            Err(e) => {
                warn!("classifying {} failed, treating as no match: {e:#}", email.id);
                session.scan.classification_errors += 1;
                (false, String::new())
            }
        };
        session.scan.total_scanned += 1;

        observer.progress(&ScanProgress {
            scanned: session.scan.total_scanned,
            requested: session.scan.requested,
            found: session.review.len() + usize::from(matched),
            email: &email,
            matched,
            verdict: &verdict,
        });
        if matched {
            session.review.push(email);
        }
    }

    if session.scan.phase == ScanPhase::Scanning {
        session.scan.phase = ScanPhase::Completed;
    }
    // a stop raised during the final email must not leak into the next scan
    session.scan.cancel.store(false, Ordering::SeqCst);

    let outcome = ScanOutcome {
        scanned: session.scan.total_scanned,
        found: session.review.len(),
        cancelled: session.scan.phase == ScanPhase::Cancelled,
        classification_errors: session.scan.classification_errors,
    };
    info!(
        "scan {:?}: scanned {}, found {}",
        session.scan.phase, outcome.scanned, outcome.found
    );
    observer.finished(&outcome);
    outcome
}
