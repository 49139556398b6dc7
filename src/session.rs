use crate::review::Review;
use crate::scan::ScanState;

/// Everything one run of the tool mutates, passed by `&mut` to each handler.
#[derive(Debug, Default)]
pub struct Session {
    pub scan: ScanState,
    pub review: Review,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Scanning: counters and prior results are dropped. The cancel
    /// flag is left alone so a stop requested while fetching still counts.
    pub fn begin_scan(&mut self, requested: usize) {
        self.scan.begin(requested);
        self.review.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::ScanPhase;
    use crate::testing::emails;

    #[test]
    fn begin_scan_resets_previous_run() {
        let mut session = Session::new();
        session.review = Review::new(emails(12));
        session.review.change_page(1);
        session.review.toggle_one("m11", true);
        session.scan.total_scanned = 40;

        session.begin_scan(5);

        assert_eq!(session.scan.phase, ScanPhase::Scanning);
        assert_eq!(session.scan.total_scanned, 0);
        assert_eq!(session.scan.requested, 5);
        assert!(session.review.is_empty());
        assert_eq!(session.review.page_index(), 0);
        assert!(session.review.selection().is_empty());
    }
}
