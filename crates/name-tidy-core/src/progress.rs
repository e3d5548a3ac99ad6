/// Trait for reporting reconciliation progress.
///
/// The CLI implements it with an indicatif spinner. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_complete(&self, _total_entries: usize, _duration_secs: f64) {}
    fn on_resolve_start(&self, _phase: &str) {}
    fn on_resolve_complete(&self, _phase: &str, _decisions: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
