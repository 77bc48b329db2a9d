// ── Synchronous list controller ──
//
// Drives the state machine over a caller-supplied option list. Selected
// options are reconciled inline whenever the value prop or the list
// identity changes; search filtering is debounced.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::debounce::Debouncer;
use super::{ChangeSender, ControllerOptions, SelectCore, SelectProps, lock};
use crate::filter::OptionMatcher;
use crate::machine::{Action, SelectState};
use crate::model::{ListItem, SelectAllState, SelectOption, SelectedOptions, Value, flatten_list};
use crate::reconcile::{has_different_latest_and_previous_value, select_all_state};
use crate::stream::{SelectSnapshot, SelectStream};

/// Select controller for a static option list.
///
/// Cheaply cloneable; all clones drive the same control.
#[derive(Clone)]
pub struct SyncListController {
    inner: Arc<SyncInner>,
}

struct SyncInner {
    options: ControllerOptions,
    changes: ChangeSender,
    snapshot: watch::Sender<Arc<SelectSnapshot>>,
    debouncer: Debouncer,
    cancel: CancellationToken,
    state: Mutex<SyncState>,
}

struct SyncState {
    core: SelectCore,
    /// As supplied by the owner; compared by pointer to detect new lists.
    list: Arc<[ListItem]>,
    flat_list: Arc<[SelectOption]>,
    filtered_list: Arc<[SelectOption]>,
    query: String,
}

impl SyncState {
    fn apply_filter(&mut self, matcher: &dyn OptionMatcher, query: String) {
        self.filtered_list = matcher.filter(&self.flat_list, &query).into();
        self.query = query;
    }

    fn snapshot(&self) -> SelectSnapshot {
        SelectSnapshot {
            list: Arc::clone(&self.filtered_list),
            selected_options: self.core.selected.clone(),
            input_value: self.core.input_value.clone(),
            is_fetching_list: false,
            state: self.core.state,
            select_all: select_all_state(self.core.selected.as_ref(), &self.flat_list),
            error: None,
        }
    }
}

impl SyncInner {
    fn publish(&self, state: &SyncState) {
        let snap = Arc::new(state.snapshot());
        self.snapshot.send_modify(|s| *s = snap);
    }
}

impl Drop for SyncInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl SyncListController {
    /// Mount a controller. A controlled `value` (or, failing that, a
    /// `default_value`) is reconciled against `list` immediately.
    pub fn new(
        props: SelectProps,
        list: impl Into<Arc<[ListItem]>>,
        changes: ChangeSender,
        options: ControllerOptions,
    ) -> Self {
        let list = list.into();
        let flat_list: Arc<[SelectOption]> = flatten_list(&list).into();

        let mut core = SelectCore::new(props);
        if let Some(value) = core.initial_value() {
            core.reconcile(
                &value,
                &flat_list,
                options.diagnostics.as_ref(),
                &options.config,
            );
        }
        let query = core.seed_search_query().unwrap_or_default();

        let mut state = SyncState {
            core,
            list,
            flat_list,
            filtered_list: Arc::from(Vec::new()),
            query: String::new(),
        };
        state.apply_filter(options.matcher.as_ref(), query);

        let (snapshot, _) = watch::channel(Arc::new(state.snapshot()));
        let cancel = CancellationToken::new();
        let debouncer = Debouncer::new(options.config.debounce, cancel.clone());

        Self {
            inner: Arc::new(SyncInner {
                options,
                changes,
                snapshot,
                debouncer,
                cancel,
                state: Mutex::new(state),
            }),
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Feed one user interaction through the state machine.
    pub fn dispatch(&self, action: Action) {
        let mut state = lock(&self.inner.state);
        let flat_list = Arc::clone(&state.flat_list);
        let outcome = state.core.dispatch(
            action,
            &flat_list,
            &self.inner.changes,
            &self.inner.options.config,
        );
        for query in outcome.searches {
            self.search(&mut state, query);
        }
        self.inner.publish(&state);
    }

    fn search(&self, state: &mut SyncState, query: String) {
        if self.inner.debouncer.is_immediate() {
            state.apply_filter(self.inner.options.matcher.as_ref(), query);
            return;
        }

        let weak: Weak<SyncInner> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(move || async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = lock(&inner.state);
            debug!(query_len = query.len(), "applying debounced filter");
            state.apply_filter(inner.options.matcher.as_ref(), query);
            inner.publish(&state);
        });
    }

    /// Deliver keyboard changes queued by `defer_keyboard_change`.
    pub fn flush_deferred(&self) -> usize {
        lock(&self.inner.state)
            .core
            .flush_deferred(&self.inner.changes)
    }

    // ── Prop updates ─────────────────────────────────────────────────

    /// The owner passed a (possibly) new value prop.
    pub fn set_value(&self, value: impl Into<Value>) {
        let value = value.into();
        let mut state = lock(&self.inner.state);
        state.core.props.value = value.clone();
        if !value.is_controlled()
            || !has_different_latest_and_previous_value(&value, &state.core.last_value)
        {
            return;
        }

        debug!(?value, "reconciling controlled value");
        let flat_list = Arc::clone(&state.flat_list);
        state.core.reconcile(
            &value,
            &flat_list,
            self.inner.options.diagnostics.as_ref(),
            &self.inner.options.config,
        );
        self.inner.publish(&state);
    }

    /// The owner passed a list. Only a different `Arc` counts as a change.
    pub fn set_list(&self, list: impl Into<Arc<[ListItem]>>) {
        let list = list.into();
        let mut state = lock(&self.inner.state);
        if Arc::ptr_eq(&state.list, &list) {
            return;
        }

        state.flat_list = flatten_list(&list).into();
        state.list = list;
        debug!(options = state.flat_list.len(), "option list replaced");

        if state.core.is_controlled() {
            let value = state.core.props.value.clone();
            let flat_list = Arc::clone(&state.flat_list);
            state.core.reconcile(
                &value,
                &flat_list,
                self.inner.options.diagnostics.as_ref(),
                &self.inner.options.config,
            );
        }
        let query = state.query.clone();
        state.apply_filter(self.inner.options.matcher.as_ref(), query);
        self.inner.publish(&state);
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<SelectSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> SelectStream {
        SelectStream::new(self.inner.snapshot.subscribe())
    }

    /// Value derived from the selected options.
    pub fn value(&self) -> Value {
        lock(&self.inner.state).core.value()
    }

    pub fn selected_options(&self) -> Option<SelectedOptions> {
        lock(&self.inner.state).core.selected.clone()
    }

    pub fn input_value(&self) -> String {
        lock(&self.inner.state).core.input_value.clone()
    }

    pub fn filtered_list(&self) -> Arc<[SelectOption]> {
        Arc::clone(&lock(&self.inner.state).filtered_list)
    }

    pub fn state(&self) -> SelectState {
        lock(&self.inner.state).core.state
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let state = lock(&self.inner.state);
        select_all_state(state.core.selected.as_ref(), &state.flat_list)
    }

    /// Drop pending debounced work.
    pub fn close(&self) {
        self.inner.debouncer.cancel_pending();
        self.inner.cancel.cancel();
    }
}
