use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "name-tidy")]
#[command(about = "Clean up numbered duplicates and drifted sidecar names", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find same-size files carrying a " (N)" marker next to their original
    Duplicates(TargetArgs),
    /// Rename sidecar files to match their base file, remove orphaned ones
    Sidecars(TargetArgs),
    /// Run duplicates, then sidecars, over one scan
    All(TargetArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Directory tree to reconcile
    pub dir: PathBuf,
    /// Delete and rename files instead of only listing the changes
    #[arg(long)]
    pub apply: bool,
}
