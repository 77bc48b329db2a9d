//! CLI error types with miette diagnostics.
//!
//! Maps input, config and serialization failures into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use selectra_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const INPUT: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input files ──────────────────────────────────────────────────

    #[error("Could not read {path}")]
    #[diagnostic(
        code(selectra::read_failed),
        help("Check that the file exists and is readable.")
    )]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {what}")]
    #[diagnostic(
        code(selectra::json),
        help(
            "Option lists are arrays of {{\"value\": 1, \"label\": \"A\"}} objects;\n\
             scripts are arrays of {{\"type\": \"open\"}}-style actions."
        )
    )]
    InvalidJson {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(selectra::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(selectra::config_exists),
        help("Use --force (-f) to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(selectra::config),
        help("Inspect the file with: selectra config show\nLocate it with: selectra config path")
    )]
    Config(#[from] ConfigError),

    // ── Serialization ────────────────────────────────────────────────

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(selectra::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ReadFailed { .. } | Self::InvalidJson { .. } => exit_code::INPUT,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ConfigExists { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Render(_) => exit_code::GENERAL,
        }
    }
}
