use indicatif::{ProgressBar, ProgressStyle};
use name_tidy_core::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;

/// Spinner on stderr while the tree is scanned and each resolver runs.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        self.start_spinner("Scanning files...".to_string());
    }

    fn on_scan_complete(&self, total_entries: usize, duration_secs: f64) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} entries in {:.2}s",
            total_entries, duration_secs
        );
    }

    fn on_resolve_start(&self, phase: &str) {
        self.start_spinner(format!("Resolving {}...", phase));
    }

    fn on_resolve_complete(&self, phase: &str, decisions: usize, duration_secs: f64) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m {}: {} decisions in {:.2}s",
            phase, decisions, duration_secs
        );
    }
}
