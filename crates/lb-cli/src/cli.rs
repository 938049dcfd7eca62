use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "linebreak",
    about = "linebreak — diff and merge turns of a shared program",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show how a modified listing relates to its ancestor
    Diff(DiffArgs),
    /// Check a turn against the game rules
    Validate(ValidateArgs),
    /// Merge two turns played against the same ancestor
    Merge(MergeArgs),
    /// Rebuild the ancestor listing with a turn's insertions
    Apply(DiffArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub original: PathBuf,
    pub modified: PathBuf,
}

#[derive(Args)]
pub struct ValidateArgs {
    pub original: PathBuf,
    pub modified: PathBuf,
    /// TOML file overriding the default turn policy
    #[arg(long)]
    pub policy: Option<PathBuf>,
}

#[derive(Args)]
pub struct MergeArgs {
    pub ancestor: PathBuf,
    pub a: PathBuf,
    pub b: PathBuf,
    /// Seed for the interleaving and label placement
    #[arg(long)]
    pub seed: Option<u64>,
}
