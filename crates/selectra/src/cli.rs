//! Clap derive structures for the `selectra` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// selectra -- drive a headless select control from the command line
#[derive(Debug, Parser)]
#[command(
    name = "selectra",
    version,
    about = "Resolve, search and replay select controls from the command line",
    long_about = "Drives the selectra select engine over JSON option lists.\n\n\
        Option lists are JSON arrays of `{\"value\", \"label\"}` objects, optionally\n\
        grouped as `{\"label\", \"options\": [...]}`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SELECTRA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output (defaults to the configured one)
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a value against an option list
    #[command(alias = "r")]
    Resolve(ResolveArgs),

    /// Filter an option list by search text
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Feed a script of actions through a select control
    Replay(ReplayArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArg {
    /// JSON option list file (`-` for stdin)
    #[arg(long, short = 'l')]
    pub list: PathBuf,
}

// ── Subcommand Arguments ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub list: ListArg,

    /// Value as JSON: `2`, `"id"`, `[1, 2]` or `null`
    #[arg(long)]
    pub value: String,

    /// Treat the control as multi-select
    #[arg(long, short = 'm')]
    pub multi: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub list: ListArg,

    /// Search text
    #[arg(long)]
    pub query: String,
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub list: ListArg,

    /// JSON file holding an array of actions
    #[arg(long)]
    pub script: PathBuf,

    /// Treat the control as multi-select
    #[arg(long, short = 'm')]
    pub multi: bool,

    /// Initial value as JSON (controlled)
    #[arg(long)]
    pub value: Option<String>,

    /// Allow Enter to create options from free text
    #[arg(long)]
    pub creatable: bool,

    /// Field name echoed in change events
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
