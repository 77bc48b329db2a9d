//! Headless select/combobox engine shared by every selectra consumer.
//!
//! The crate owns the behavior of a single/multi-value select control,
//! independent of how it is rendered:
//!
//! - **Domain model** ([`model`]) — [`SelectOption`], nested [`ListItem`]
//!   groups, the external [`Value`], and derived [`SelectedOptions`].
//!
//! - **[`reconcile`]** — Pure helpers that convert between an external value
//!   and the selected option objects looked up in the current flat list,
//!   preserving unmatched values as orphans.
//!
//! - **[`machine`]** — The select state machine: a closed [`Action`] set and
//!   a pure [`transition`] that yields the next [`SelectState`] plus an
//!   ordered list of [`Effect`]s for the controller to apply.
//!
//! - **[`SyncListController`]** — Drives the machine over a static option
//!   list, filtering it by the search query.
//!
//! - **[`AsyncListController`]** — Drives the machine over an [`AsyncList`]
//!   query function with debounced fetching, stale-response suppression and
//!   out-of-band resolution of selected values.
//!
//! - **[`SelectStream`]** — Watch-backed subscription to the published
//!   [`SelectSnapshot`] for the presentation layer.

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod machine;
pub mod model;
pub mod reconcile;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SelectConfig;
pub use controller::{
    AsyncList, AsyncListController, ChangeEvent, ControllerOptions, SelectProps,
    SyncListController,
};
pub use diagnostics::{Diagnostics, FetchContext, FetchKind, RecordingDiagnostics, TracingDiagnostics};
pub use error::SelectError;
pub use filter::{LabelMatcher, OptionMatcher};
pub use machine::{
    Action, Effect, EventSource, ExtraParams, Key, SelectContext, SelectState, Transition,
    transition,
};
pub use model::{
    ListItem, OptionValue, SELECT_ALL_VALUE, SelectAllState, SelectOption, SelectedOptions, Value,
    flatten_list,
};
pub use stream::{SelectSnapshot, SelectStream, SelectWatchStream};
