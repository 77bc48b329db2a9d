// ── Runtime controller configuration ──
//
// Tuning knobs for the list controllers. Built by the host (or by
// `selectra-config` from a TOML file) and handed in; core never reads
// config files.

use std::time::Duration;

/// Configuration shared by the synchronous and asynchronous controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// Quiet period after the last keystroke before filtering/fetching.
    /// Zero applies every query immediately.
    pub debounce: Duration,
    /// Queue keyboard-originated single-select changes until the host
    /// calls `flush_deferred()` on its next tick.
    pub defer_keyboard_change: bool,
    /// Report values missing from the list through `Diagnostics`.
    pub warn_on_orphan_values: bool,
    /// Maximum query length carried into fetch-failure diagnostics.
    pub max_logged_query_len: usize,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            defer_keyboard_change: false,
            warn_on_orphan_values: true,
            max_logged_query_len: 64,
        }
    }
}

impl SelectConfig {
    /// No debounce, everything applied inline. Handy for tests and
    /// for hosts that debounce input themselves.
    pub fn immediate() -> Self {
        Self {
            debounce: Duration::ZERO,
            ..Self::default()
        }
    }
}
