use indicatif::{ProgressBar, ProgressStyle};

use crate::scan::{ScanObserver, ScanOutcome, ScanProgress};

const VERDICT_WIDTH: usize = 60;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} Found: {prefix} {wide_msg}";

/// Terminal progress bar for an interactive scan.
pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for BarObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Current email plus the model's answer, cut to one line.
fn status_line(u: &ScanProgress<'_>) -> String {
    let verdict = u.verdict.split_whitespace().collect::<Vec<_>>().join(" ");
    let verdict = if verdict.is_empty() {
        "(no answer)".to_string()
    } else if verdict.chars().count() > VERDICT_WIDTH {
        let cut: String = verdict.chars().take(VERDICT_WIDTH).collect();
        format!("{cut}...")
    } else {
        verdict
    };
    format!("{} ({}) AI: {verdict}", u.email.subject, u.email.sender)
}

impl ScanObserver for BarObserver {
    fn started(&mut self, requested: usize) {
        let bar = ProgressBar::new(requested as u64);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix("0");
        bar.set_message("Starting email analysis... (Ctrl-C to stop)");
        self.bar = bar;
    }

    fn progress(&mut self, u: &ScanProgress<'_>) {
        self.bar.set_position(u.scanned as u64);
        self.bar.set_prefix(u.found.to_string());
        self.bar.set_message(status_line(u));
    }

    fn finished(&mut self, _outcome: &ScanOutcome) {
        self.bar.finish_and_clear();
    }
}
