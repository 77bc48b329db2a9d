// ── List controllers ──
//
// Shared plumbing for the synchronous and asynchronous controllers:
// props, change events, injected collaborators, and `SelectCore`, which
// runs the state machine and applies its effects in order.

mod async_list;
mod debounce;
mod source;
mod sync_list;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::SelectConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::filter::{LabelMatcher, OptionMatcher};
use crate::machine::{Action, Effect, ExtraParams, SelectContext, SelectState, Transition, transition};
use crate::model::{SelectOption, SelectedOptions, Value};
use crate::reconcile::{
    ConstructOptions, construct_selected_options_from_value, get_value_from_selected_options,
};

pub use async_list::AsyncListController;
pub use source::{AsyncList, ListFuture};
pub use sync_list::SyncListController;

// ── Props ────────────────────────────────────────────────────────────

/// Inputs supplied by the owner of a select control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectProps {
    /// Form field name, echoed in every [`ChangeEvent`].
    pub name: Option<String>,
    /// Controlled value. `Undefined` leaves the control uncontrolled.
    pub value: Value,
    /// Seed for an uncontrolled control.
    pub default_value: Value,
    pub is_multi: bool,
    pub is_disabled: bool,
    /// Enter on unmatched text creates a new option.
    pub is_creatable: bool,
    /// Initial search text when no controlled value exists.
    pub default_search_query: Option<String>,
}

impl SelectProps {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn multi() -> Self {
        Self {
            is_multi: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    #[must_use]
    pub fn with_default_search_query(mut self, query: impl Into<String>) -> Self {
        self.default_search_query = Some(query.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = disabled;
        self
    }

    #[must_use]
    pub fn creatable(mut self) -> Self {
        self.is_creatable = true;
        self
    }
}

// ── Change events ────────────────────────────────────────────────────

/// Notification sent to the owner whenever the user changes the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub name: Option<String>,
    pub value: Value,
    pub selected: Option<SelectedOptions>,
    pub extra: ExtraParams,
}

/// Channel on which controllers deliver [`ChangeEvent`]s.
pub type ChangeSender = mpsc::UnboundedSender<ChangeEvent>;

// ── Collaborators ────────────────────────────────────────────────────

/// Injected collaborators and tuning for a controller.
#[derive(Clone)]
pub struct ControllerOptions {
    pub config: SelectConfig,
    pub diagnostics: Arc<dyn Diagnostics>,
    pub matcher: Arc<dyn OptionMatcher>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            config: SelectConfig::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            matcher: Arc::new(LabelMatcher),
        }
    }
}

impl fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ControllerOptions {
    #[must_use]
    pub fn with_config(mut self, config: SelectConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Arc<dyn OptionMatcher>) -> Self {
        self.matcher = matcher;
        self
    }
}

/// Poisoning only happens if a matcher or diagnostics hook panicked;
/// the guarded data is still consistent at that point.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What one [`SelectCore::dispatch`] call asked the controller to do.
#[derive(Debug, Default)]
pub(crate) struct Dispatched {
    /// Queries to filter or fetch for, in order.
    pub(crate) searches: Vec<String>,
    /// A change was emitted (or queued for deferred delivery).
    pub(crate) changed: bool,
}

// ── SelectCore ───────────────────────────────────────────────────────

/// State shared by both controllers: the reducer state plus the data its
/// effects write to.
pub(crate) struct SelectCore {
    pub(crate) props: SelectProps,
    pub(crate) state: SelectState,
    pub(crate) selected: Option<SelectedOptions>,
    pub(crate) input_value: String,
    /// Value the current `selected` was derived from or emitted as.
    pub(crate) last_value: Value,
    deferred: Vec<ChangeEvent>,
}

impl SelectCore {
    pub(crate) fn new(props: SelectProps) -> Self {
        Self {
            props,
            state: SelectState::default(),
            selected: None,
            input_value: String::new(),
            last_value: Value::Undefined,
            deferred: Vec::new(),
        }
    }

    pub(crate) fn is_controlled(&self) -> bool {
        self.props.value.is_controlled()
    }

    /// Controlled value, or the default value for an uncontrolled control.
    pub(crate) fn initial_value(&self) -> Option<Value> {
        if self.is_controlled() {
            Some(self.props.value.clone())
        } else if self.props.default_value.is_controlled() {
            Some(self.props.default_value.clone())
        } else {
            None
        }
    }

    /// Apply `default_search_query` to an uncontrolled control with no
    /// text yet. Returns the query to filter by.
    pub(crate) fn seed_search_query(&mut self) -> Option<String> {
        if self.is_controlled() || !self.input_value.is_empty() {
            return None;
        }
        let query = self.props.default_search_query.clone()?;
        self.input_value.clone_from(&query);
        Some(query)
    }

    /// Run one transition and apply its effects in order.
    pub(crate) fn dispatch(
        &mut self,
        action: Action,
        flat_list: &[SelectOption],
        changes: &ChangeSender,
        config: &SelectConfig,
    ) -> Dispatched {
        let name = action.name();
        let ctx = SelectContext {
            is_multi: self.props.is_multi,
            is_disabled: self.props.is_disabled,
            is_creatable: self.props.is_creatable,
            flat_list,
            selected: self.selected.as_ref(),
            input_value: &self.input_value,
        };
        let Transition { state, effects } = transition(self.state, action, &ctx);
        trace!(action = name, effects = effects.len(), "select transition");

        self.state = state;
        let mut outcome = Dispatched::default();
        for effect in effects {
            match effect {
                Effect::SetInputValue(text) => self.input_value = text,
                Effect::SetSelected(selected) => self.selected = selected,
                Effect::Search(query) => outcome.searches.push(query),
                Effect::Change {
                    value,
                    selected,
                    extra,
                } => {
                    outcome.changed = true;
                    self.emit(
                        ChangeEvent {
                            name: self.props.name.clone(),
                            value,
                            selected,
                            extra,
                        },
                        changes,
                        config,
                    );
                }
            }
        }
        outcome
    }

    fn emit(&mut self, event: ChangeEvent, changes: &ChangeSender, config: &SelectConfig) {
        self.last_value = event.value.clone();
        if event.extra.deferred && config.defer_keyboard_change {
            trace!("deferring keyboard change to next tick");
            self.deferred.push(event);
            return;
        }
        debug!(value = ?event.value, source = %event.extra.source, created = event.extra.created, "select change");
        // A dropped receiver means the owner stopped listening.
        let _ = changes.send(event);
    }

    /// Deliver queued keyboard changes. Returns how many were sent.
    pub(crate) fn flush_deferred(&mut self, changes: &ChangeSender) -> usize {
        let pending = std::mem::take(&mut self.deferred);
        let count = pending.len();
        for event in pending {
            let _ = changes.send(event);
        }
        count
    }

    /// Derive selected options for `value` from `list`. Single-select input
    /// text follows the selected label unless the user is typing.
    pub(crate) fn reconcile(
        &mut self,
        value: &Value,
        list: &[SelectOption],
        diagnostics: &dyn Diagnostics,
        config: &SelectConfig,
    ) {
        let options = ConstructOptions {
            is_multi: self.props.is_multi,
            check_for_invalid_value: config.warn_on_orphan_values,
        };
        self.selected = construct_selected_options_from_value(value, list, options, diagnostics);
        if !self.props.is_multi && !self.state.is_search_input_focused {
            self.input_value = self
                .selected
                .as_ref()
                .and_then(SelectedOptions::single_label)
                .unwrap_or_default()
                .to_owned();
        }
        self.last_value = value.clone();
    }

    pub(crate) fn value(&self) -> Value {
        get_value_from_selected_options(self.selected.as_ref(), self.props.is_multi)
    }
}
