use std::fmt;
use std::path::{Path, PathBuf};

use crate::resolver::duplicates::DuplicatePair;
use crate::resolver::sidecar::BindingDecision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compute and print decisions; never touch the filesystem.
    Preview,
    /// Execute each decision's mutation, then print its outcome.
    Apply,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Duplicate(DuplicatePair),
    Sidecar {
        sidecar: PathBuf,
        binding: BindingDecision,
    },
}

/// The single filesystem mutation a decision implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'d> {
    Remove(&'d Path),
    Rename { from: &'d Path, to: &'d Path },
}

impl Decision {
    pub fn action(&self) -> Option<Action<'_>> {
        match self {
            Decision::Duplicate(pair) => Some(Action::Remove(&pair.duplicate)),
            Decision::Sidecar { sidecar, binding } => match binding {
                BindingDecision::Orphaned => Some(Action::Remove(sidecar)),
                BindingDecision::Conflict { existing } => Some(Action::Remove(existing)),
                BindingDecision::NeedsRename { target } => Some(Action::Rename {
                    from: sidecar,
                    to: target,
                }),
                BindingDecision::AlreadyCorrect
                | BindingDecision::Ambiguous
                | BindingDecision::DestinationBound { .. }
                | BindingDecision::CaseConflict { .. } => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Preview mode, or a decision with nothing to execute.
    NotExecuted,
    Applied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub decision: Decision,
    pub outcome: Outcome,
}

/// Tallies of completed decisions. Failed mutations only count towards `failed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub duplicate_pairs: usize,
    pub renamed: usize,
    pub removed: usize,
    pub skipped: usize,
    pub ambiguous: usize,
    pub already_correct: usize,
    pub failed: usize,
}

impl Summary {
    /// Nothing to act on and nothing that needs a human.
    pub fn is_clean(&self) -> bool {
        self.duplicate_pairs + self.renamed + self.removed + self.skipped + self.ambiguous + self.failed
            == 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplicate pair(s), {} renamed, {} removed, {} skipped, {} ambiguous",
            self.duplicate_pairs, self.renamed, self.removed, self.skipped, self.ambiguous
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

/// Every decision of one run, in the order it was made.
#[derive(Debug)]
pub struct ReconciliationReport {
    root: PathBuf,
    mode: Mode,
    entries: Vec<ReportEntry>,
}

impl ReconciliationReport {
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            root: root.into(),
            mode,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn decisions(&self) -> impl Iterator<Item = &Decision> {
        self.entries.iter().map(|entry| &entry.decision)
    }

    pub fn push(&mut self, decision: Decision, outcome: Outcome) {
        self.entries.push(ReportEntry { decision, outcome });
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for entry in &self.entries {
            if matches!(entry.outcome, Outcome::Failed(_)) {
                summary.failed += 1;
                continue;
            }
            match &entry.decision {
                Decision::Duplicate(_) => summary.duplicate_pairs += 1,
                Decision::Sidecar { binding, .. } => match binding {
                    BindingDecision::AlreadyCorrect => summary.already_correct += 1,
                    BindingDecision::Ambiguous => summary.ambiguous += 1,
                    BindingDecision::Orphaned | BindingDecision::Conflict { .. } => {
                        summary.removed += 1
                    }
                    BindingDecision::NeedsRename { .. } => summary.renamed += 1,
                    BindingDecision::DestinationBound { .. } => summary.skipped += 1,
                    BindingDecision::CaseConflict { .. } => {}
                },
            }
        }
        summary
    }

    /// Output lines for the whole run: one line per actionable decision, its
    /// outcome in apply mode, and a closing summary.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .flat_map(|entry| self.entry_lines(entry))
            .collect();

        let summary = self.summary();
        if summary.is_clean() {
            lines.push("Nothing to reconcile.".to_string());
        }
        let label = match self.mode {
            Mode::Preview => "Preview",
            Mode::Apply => "Summary",
        };
        lines.push(format!("{}: {}", label, summary));
        lines
    }

    fn entry_lines(&self, entry: &ReportEntry) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(line) = self.decision_line(&entry.decision) {
            lines.push(line);
        }
        if let Some(line) = self.outcome_line(entry) {
            lines.push(line);
        }
        lines
    }

    fn decision_line(&self, decision: &Decision) -> Option<String> {
        let line = match decision {
            Decision::Duplicate(pair) => format!(
                "{} <-> {} (Size: {} bytes)",
                self.rel(&pair.original),
                self.rel(&pair.duplicate),
                pair.size
            ),
            Decision::Sidecar { sidecar, binding } => match binding {
                BindingDecision::NeedsRename { target } => {
                    format!("{} -> {}", self.rel(sidecar), self.rel(target))
                }
                BindingDecision::Orphaned => format!(
                    "[REMOVE] {} (orphaned sidecar, no base file exists)",
                    self.rel(sidecar)
                ),
                BindingDecision::Conflict { existing } => format!(
                    "[REMOVE] {} (orphaned sidecar, base doesn't exist)",
                    self.rel(existing)
                ),
                BindingDecision::DestinationBound { existing } => format!(
                    "[SKIP] {} (destination already exists: {})",
                    self.rel(sidecar),
                    self.rel(existing)
                ),
                BindingDecision::AlreadyCorrect
                | BindingDecision::Ambiguous
                | BindingDecision::CaseConflict { .. } => return None,
            },
        };
        Some(line)
    }

    fn outcome_line(&self, entry: &ReportEntry) -> Option<String> {
        let action = entry.decision.action()?;
        let line = match (&entry.outcome, action) {
            (Outcome::NotExecuted, _) => return None,
            (Outcome::Applied, Action::Remove(path)) => format!("  Removed: {}", self.rel(path)),
            (Outcome::Applied, Action::Rename { from, to }) => {
                format!("  Renamed: {} to {}", self.rel(from), self.rel(to))
            }
            (Outcome::Failed(err), Action::Remove(path)) => {
                format!("  Error removing {}: {}", self.rel(path), err)
            }
            (Outcome::Failed(err), Action::Rename { from, .. }) => {
                format!("  Error renaming {}: {}", self.rel(from), err)
            }
        };
        Some(line)
    }

    fn rel(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
