//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Multitarget - inspect a multiplatform build model
#[derive(Parser)]
#[command(name = "multitarget")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Multitarget.toml
    #[arg(long, global = true, env = "MULTITARGET_MANIFEST")]
    pub manifest_path: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a Multitarget.toml in an existing directory
    Init(InitArgs),

    /// List the configured targets and their compilations
    Targets(TargetsArgs),

    /// List the presets available on this host
    Presets,

    /// Show the source-set dependsOn graph
    SourceSets,

    /// List publications and their variants
    Publications,

    /// List tasks and whether they would run
    Tasks(TasksArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct TargetsArgs {
    /// Show a single target
    pub target: Option<String>,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Only show tasks that would be skipped
    #[arg(long)]
    pub skipped: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
