pub mod config;
pub mod engine;
pub mod error;
pub mod filesystem;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod resolver;
pub mod scanner;

pub use config::AppConfig;
pub use engine::{ReconcileEngine, Task};
pub use error::Error;
pub use filesystem::{FileStat, FileSystem, LocalFileSystem};
pub use normalize::normalize;
pub use progress::{ProgressReporter, SilentReporter};
pub use report::{Action, Decision, Mode, Outcome, ReconciliationReport, ReportEntry, Summary};
pub use resolver::duplicates::DuplicatePair;
pub use resolver::sidecar::{BindingDecision, SidecarBinder};
pub use scanner::{DirectoryEntry, Namespace, Snapshot};
