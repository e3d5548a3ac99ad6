use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::filesystem::{FileSystem, LocalFileSystem};
use crate::progress::ProgressReporter;
use crate::report::{Action, Decision, Mode, Outcome, ReconciliationReport};
use crate::resolver::duplicates::resolve_duplicates;
use crate::resolver::is_sidecar;
use crate::resolver::sidecar::SidecarBinder;
use crate::scanner::{self, Namespace, Snapshot};

/// Which resolvers a run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Duplicates,
    Sidecars,
    /// Duplicates first, then sidecars, over the same snapshot.
    All,
}

impl Task {
    fn includes_duplicates(self) -> bool {
        matches!(self, Task::Duplicates | Task::All)
    }

    fn includes_sidecars(self) -> bool {
        matches!(self, Task::Sidecars | Task::All)
    }
}

pub struct ReconcileEngine<F: FileSystem = LocalFileSystem> {
    config: AppConfig,
    fs: F,
}

impl ReconcileEngine<LocalFileSystem> {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            fs: LocalFileSystem,
        }
    }
}

/// Per-run state threaded through both resolvers.
struct Run {
    mode: Mode,
    sidecar_suffix: String,
    report: ReconciliationReport,
}

impl<F: FileSystem> ReconcileEngine<F> {
    pub fn with_file_system<G: FileSystem>(self, fs: G) -> ReconcileEngine<G> {
        ReconcileEngine {
            config: self.config,
            fs,
        }
    }

    /// Reconcile the tree under `root`:
    /// 1. Validate the root, then snapshot it once
    /// 2. Resolve duplicate pairs and/or sidecar bindings, each independently
    ///    against that snapshot
    /// 3. In apply mode, execute each decision as soon as it is made
    ///
    /// Only an unusable root or an unreadable subtree fails the run. Failed
    /// mutations are recorded on their report entry and the run carries on.
    pub fn run(
        &self,
        root: &Path,
        task: Task,
        mode: Mode,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReconciliationReport> {
        scanner::walk::validate_root(root)?;

        info!("Scanning {}...", root.display());
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let snapshot = scanner::scan(root, &self.config.ignore_globs())?;
        let scan_secs = scan_start.elapsed().as_secs_f64();
        reporter.on_scan_complete(snapshot.len(), scan_secs);
        debug!(
            "Scan completed in {:.2}s: {} entries",
            scan_secs,
            snapshot.len()
        );

        let mut run = Run {
            mode,
            sidecar_suffix: self.config.sidecar_suffix(),
            report: ReconciliationReport::new(snapshot.root(), mode),
        };

        if task.includes_duplicates() {
            self.reconcile_duplicates(&snapshot, &mut run, reporter);
        }
        if task.includes_sidecars() {
            self.reconcile_sidecars(&snapshot, &mut run, reporter);
        }

        info!("{:?} finished: {}", mode, run.report.summary());
        Ok(run.report)
    }

    fn reconcile_duplicates(
        &self,
        snapshot: &Snapshot,
        run: &mut Run,
        reporter: &dyn ProgressReporter,
    ) {
        info!("Resolving duplicate pairs...");
        reporter.on_resolve_start("duplicates");
        let start = Instant::now();

        let pairs = resolve_duplicates(snapshot, &run.sidecar_suffix);
        let count = pairs.len();
        for pair in pairs {
            self.record(run, None, Decision::Duplicate(pair));
        }

        reporter.on_resolve_complete("duplicates", count, start.elapsed().as_secs_f64());
    }

    fn reconcile_sidecars(
        &self,
        snapshot: &Snapshot,
        run: &mut Run,
        reporter: &dyn ProgressReporter,
    ) {
        info!("Binding sidecars...");
        reporter.on_resolve_start("sidecars");
        let start = Instant::now();
        let mut count = 0;

        // Starts from the scan snapshot: duplicate removals of this run stay
        // invisible here, only the sidecar pass's own mutations are tracked.
        let mut namespace = Namespace::new(snapshot);

        for sidecar in snapshot.entries() {
            if sidecar.is_dir || !is_sidecar(&sidecar.name, &run.sidecar_suffix) {
                continue;
            }
            if !namespace.contains(&sidecar.path) {
                debug!(
                    "{} was removed earlier in this run",
                    sidecar.path.display()
                );
                continue;
            }

            let binding =
                SidecarBinder::new(&namespace, &self.fs, &run.sidecar_suffix).bind(sidecar);
            self.record(
                run,
                Some(&mut namespace),
                Decision::Sidecar {
                    sidecar: sidecar.path.clone(),
                    binding,
                },
            );
            count += 1;
        }

        reporter.on_resolve_complete("sidecars", count, start.elapsed().as_secs_f64());
    }

    /// Execute (apply mode) and record one decision. The namespace, when given,
    /// only learns about mutations that happened, or would happen in preview.
    fn record(&self, run: &mut Run, namespace: Option<&mut Namespace<'_>>, decision: Decision) {
        let outcome = match decision.action() {
            None => Outcome::NotExecuted,
            Some(action) => match run.mode {
                Mode::Preview => {
                    commit(namespace, action);
                    Outcome::NotExecuted
                }
                Mode::Apply => match self.execute(action) {
                    Ok(()) => {
                        commit(namespace, action);
                        Outcome::Applied
                    }
                    Err(err) => Outcome::Failed(err.to_string()),
                },
            },
        };
        run.report.push(decision, outcome);
    }

    fn execute(&self, action: Action<'_>) -> io::Result<()> {
        match action {
            Action::Remove(path) => self.fs.remove(path).map_err(|err| {
                error!("Error removing {}: {}", path.display(), err);
                err
            }),
            Action::Rename { from, to } => self.fs.rename(from, to).map_err(|err| {
                error!(
                    "Error renaming {} to {}: {}",
                    from.display(),
                    to.display(),
                    err
                );
                err
            }),
        }
    }
}

fn commit(namespace: Option<&mut Namespace<'_>>, action: Action<'_>) {
    let Some(namespace) = namespace else {
        return;
    };
    match action {
        Action::Remove(path) => namespace.commit_removal(path),
        Action::Rename { from, to } => namespace.commit_rename(from, to),
    }
}
