// ── Diagnostics sink ──
//
// Controllers report orphan values, fetch failures and user-facing alerts
// through an injected `Diagnostics` handle scoped to the controller.
// `TracingDiagnostics` forwards to `tracing`; `RecordingDiagnostics`
// keeps everything in memory for tests and headless hosts.

use std::sync::{Mutex, PoisonError};

use strum::{AsRefStr, Display};
use tracing::{error, warn};

use crate::error::SelectError;
use crate::model::OptionValue;

/// Which fetch path failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FetchKind {
    /// Visible dropdown list for a search query.
    List,
    /// Out-of-band lookup used to label selected values.
    SelectedOptions,
}

/// Sanitized context attached to a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    pub kind: FetchKind,
    /// Query text, truncated and stripped of control characters.
    pub query: String,
    pub generation: u64,
}

impl FetchContext {
    pub fn new(kind: FetchKind, query: &str, generation: u64, max_query_len: usize) -> Self {
        Self {
            kind,
            query: sanitize_query(query, max_query_len),
            generation,
        }
    }
}

/// Observability hooks for a single controller.
pub trait Diagnostics: Send + Sync {
    /// A defined value has no matching option and was kept as an orphan.
    fn orphan_value(&self, value: &OptionValue);

    /// A list or selected-option fetch failed.
    fn fetch_failed(&self, context: &FetchContext, error: &SelectError);

    /// Best-effort message meant for the user.
    fn alert(&self, message: &str);
}

/// Truncate to `max_len` characters and replace control characters so
/// user-typed text never breaks log lines.
pub fn sanitize_query(query: &str, max_len: usize) -> String {
    let mut out: String = query
        .chars()
        .take(max_len)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if query.chars().count() > max_len {
        out.push('…');
    }
    out
}

// ── TracingDiagnostics ───────────────────────────────────────────────

/// Default diagnostics backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn orphan_value(&self, value: &OptionValue) {
        warn!(%value, "selected value not found in option list; keeping it as an orphan");
    }

    fn fetch_failed(&self, context: &FetchContext, error: &SelectError) {
        error!(
            kind = %context.kind,
            query = %context.query,
            generation = context.generation,
            error_kind = error.kind(),
            error = %error,
            "option fetch failed"
        );
    }

    fn alert(&self, message: &str) {
        warn!(alert = message, "user alert");
    }
}

// ── RecordingDiagnostics ─────────────────────────────────────────────

/// In-memory diagnostics, useful in tests and for hosts that render
/// alerts themselves.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    orphans: Mutex<Vec<OptionValue>>,
    failures: Mutex<Vec<(FetchContext, SelectError)>>,
    alerts: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orphans(&self) -> Vec<OptionValue> {
        self.orphans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn failures(&self) -> Vec<(FetchContext, SelectError)> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn orphan_value(&self, value: &OptionValue) {
        self.orphans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value.clone());
    }

    fn fetch_failed(&self, context: &FetchContext, error: &SelectError) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((context.clone(), error.clone()));
    }

    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }
}
