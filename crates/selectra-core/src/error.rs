// ── Core error types ──
//
// Errors produced while loading option lists. None of them are fatal:
// controllers report them through `Diagnostics` and keep running.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectError {
    // ── List source errors ───────────────────────────────────────────
    #[error("Failed to load options: {message}")]
    Fetch { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed option list: {message}")]
    Malformed { message: String },
}

impl SelectError {
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Short machine-readable kind, safe to log without payload data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Malformed { .. } => "malformed",
        }
    }
}

impl From<serde_json::Error> for SelectError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}
