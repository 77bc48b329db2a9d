// ── Asynchronous list controller ──
//
// Drives the state machine over an `AsyncList`. The visible list is
// fetched on menu open and on (debounced) search text changes; every
// fetch carries a generation number and only the newest may land.
// Selected values missing from the visible list are looked up through
// the same source, purely to label them.

use std::sync::{Arc, Mutex, Weak};

use futures_util::future::join_all;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::debounce::Debouncer;
use super::source::AsyncList;
use super::{ChangeSender, ControllerOptions, SelectCore, SelectProps, lock};
use crate::diagnostics::{FetchContext, FetchKind};
use crate::error::SelectError;
use crate::machine::{Action, SelectState};
use crate::model::{OptionValue, SelectOption, SelectedOptions, Value, flatten_list};
use crate::reconcile::{has_different_latest_and_previous_value, is_invalid_value, select_all_state};
use crate::stream::{SelectSnapshot, SelectStream};

/// Select controller backed by an async option source.
///
/// Requires a tokio runtime for fetching. Cheaply cloneable; all clones
/// drive the same control. Dropping the last clone (or calling
/// [`close`](Self::close)) cancels pending debounced work and discards
/// responses that arrive afterwards.
#[derive(Clone)]
pub struct AsyncListController {
    inner: Arc<AsyncInner>,
}

struct AsyncInner {
    options: ControllerOptions,
    changes: ChangeSender,
    snapshot: watch::Sender<Arc<SelectSnapshot>>,
    debouncer: Debouncer,
    cancel: CancellationToken,
    state: Mutex<AsyncState>,
}

struct AsyncState {
    core: SelectCore,
    source: AsyncList,
    /// Flattened result of the newest applied list fetch.
    list: Arc<[SelectOption]>,
    /// Query the current `list` was fetched for. `None` until the first
    /// successful fetch, and again after the source changes.
    loaded_query: Option<String>,
    latest_search_query: String,
    list_generation: u64,
    /// Generation of the list fetch currently running, if any.
    fetching: Option<u64>,
    resolve_generation: u64,
    error: Option<String>,
}

/// Everything a list fetch needs, captured when it is issued.
struct FetchTicket {
    generation: u64,
    query: String,
    source: AsyncList,
}

impl AsyncState {
    fn issue(&mut self, query: String) -> FetchTicket {
        self.list_generation += 1;
        FetchTicket {
            generation: self.list_generation,
            query,
            source: self.source.clone(),
        }
    }

    fn needs_fetch(&self) -> bool {
        self.loaded_query.as_deref() != Some(self.latest_search_query.as_str())
    }

    /// Only the newest issued fetch counts as loading.
    fn is_fetching_list(&self) -> bool {
        self.fetching == Some(self.list_generation)
    }

    /// Start a selected-option resolution, superseding any running one.
    fn begin_resolve(&mut self, value: &Value) -> (u64, AsyncList) {
        self.core.last_value = value.clone();
        self.invalidate_resolution();
        (self.resolve_generation, self.source.clone())
    }

    /// A resolution still running must not overwrite a newer selection.
    fn invalidate_resolution(&mut self) {
        self.resolve_generation += 1;
    }
}

impl AsyncInner {
    fn snapshot_of(&self, state: &AsyncState) -> SelectSnapshot {
        SelectSnapshot {
            list: Arc::clone(&state.list),
            selected_options: state.core.selected.clone(),
            input_value: state.core.input_value.clone(),
            is_fetching_list: state.is_fetching_list(),
            state: state.core.state,
            select_all: select_all_state(state.core.selected.as_ref(), &state.list),
            error: state.error.clone(),
        }
    }

    fn publish(&self, state: &AsyncState) {
        let snap = Arc::new(self.snapshot_of(state));
        self.snapshot.send_modify(|s| *s = snap);
    }

    /// Report a failed fetch and return the alert text.
    fn report_failure(&self, kind: FetchKind, query: &str, generation: u64, err: &SelectError) -> String {
        let context = FetchContext::new(
            kind,
            query,
            generation,
            self.options.config.max_logged_query_len,
        );
        self.options.diagnostics.fetch_failed(&context, err);
        let message = err.to_string();
        self.options.diagnostics.alert(&message);
        message
    }
}

impl Drop for AsyncInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Loading flag ─────────────────────────────────────────────────────

/// Marks one list fetch as running. Dropping it clears the loading flag
/// on every exit path, unless a newer fetch has taken over the flag.
///
/// Takes the state lock on drop, so it must never be dropped while that
/// lock is held.
struct LoadingGuard {
    inner: Weak<AsyncInner>,
    generation: u64,
}

impl LoadingGuard {
    fn acquire(inner: &Arc<AsyncInner>, state: &mut AsyncState, generation: u64) -> Self {
        state.fetching = Some(generation);
        Self {
            inner: Arc::downgrade(inner),
            generation,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut state = lock(&inner.state);
        if state.fetching == Some(self.generation) {
            state.fetching = None;
            inner.publish(&state);
        }
    }
}

// ── Fetch plumbing ───────────────────────────────────────────────────

fn spawn_fetch(inner: &Arc<AsyncInner>, state: &mut AsyncState, ticket: FetchTicket) {
    if inner.cancel.is_cancelled() {
        return;
    }
    if tokio::runtime::Handle::try_current().is_err() {
        warn!("no tokio runtime available; list fetch skipped");
        return;
    }
    let guard = LoadingGuard::acquire(inner, state, ticket.generation);
    let weak = Arc::downgrade(inner);
    tokio::spawn(run_fetch(weak, ticket, guard));
}

async fn run_fetch(weak: Weak<AsyncInner>, ticket: FetchTicket, guard: LoadingGuard) {
    let Some(cancel) = weak.upgrade().map(|inner| inner.cancel.clone()) else {
        return;
    };
    debug!(generation = ticket.generation, "fetching option list");

    let result = tokio::select! {
        () = cancel.cancelled() => return,
        result = ticket.source.fetch(ticket.query.clone()) => result,
    };

    let Some(inner) = weak.upgrade() else {
        return;
    };
    if inner.cancel.is_cancelled() {
        return;
    }
    {
        let mut state = lock(&inner.state);
        if state.list_generation != ticket.generation {
            debug!(
                generation = ticket.generation,
                latest = state.list_generation,
                "discarding stale list response"
            );
            return;
        }
        state.fetching = None;
        match result {
            Ok(items) => {
                state.list = flatten_list(&items).into();
                debug!(options = state.list.len(), "option list loaded");
                state.loaded_query = Some(ticket.query);
                state.error = None;
            }
            Err(err) => {
                let message =
                    inner.report_failure(FetchKind::List, &ticket.query, ticket.generation, &err);
                state.error = Some(message);
            }
        }
        inner.publish(&state);
    }
    drop(guard);
}

impl AsyncListController {
    /// Create a controller. The list is not fetched until the menu opens
    /// or the search text changes; call [`mount`](Self::mount) to resolve
    /// the initial value.
    pub fn new(
        props: SelectProps,
        source: AsyncList,
        changes: ChangeSender,
        options: ControllerOptions,
    ) -> Self {
        let state = AsyncState {
            core: SelectCore::new(props),
            source,
            list: Arc::from(Vec::new()),
            loaded_query: None,
            latest_search_query: String::new(),
            list_generation: 0,
            fetching: None,
            resolve_generation: 0,
            error: None,
        };
        let cancel = CancellationToken::new();
        let debouncer = Debouncer::new(options.config.debounce, cancel.clone());
        let (snapshot, _) = watch::channel(Arc::new(SelectSnapshot::default()));

        Self {
            inner: Arc::new(AsyncInner {
                options,
                changes,
                snapshot,
                debouncer,
                cancel,
                state: Mutex::new(state),
            }),
        }
    }

    /// Resolve the controlled (or default) value and seed the default
    /// search query.
    pub async fn mount(&self) {
        let pending = {
            let mut state = lock(&self.inner.state);
            state.core.initial_value().map(|value| {
                let (ticket, source) = state.begin_resolve(&value);
                (value, ticket, source)
            })
        };
        if let Some((value, ticket, source)) = pending {
            self.resolve(value, ticket, source).await;
        }

        let mut state = lock(&self.inner.state);
        if let Some(query) = state.core.seed_search_query() {
            state.latest_search_query = query;
        }
        self.inner.publish(&state);
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Feed one user interaction through the state machine.
    pub fn dispatch(&self, action: Action) {
        let mut state = lock(&self.inner.state);
        let was_open = state.core.state.is_menu_open;
        let list = Arc::clone(&state.list);
        let outcome = state.core.dispatch(
            action,
            &list,
            &self.inner.changes,
            &self.inner.options.config,
        );
        if outcome.changed {
            state.invalidate_resolution();
        }

        let searched = !outcome.searches.is_empty();
        for query in outcome.searches {
            self.search(&mut state, query);
        }
        if !searched && !was_open && state.core.state.is_menu_open && state.needs_fetch() {
            let query = state.latest_search_query.clone();
            let ticket = state.issue(query);
            spawn_fetch(&self.inner, &mut state, ticket);
        }
        self.inner.publish(&state);
    }

    fn search(&self, state: &mut AsyncState, query: String) {
        state.latest_search_query.clone_from(&query);
        let ticket = state.issue(query);
        if self.inner.debouncer.is_immediate() {
            spawn_fetch(&self.inner, state, ticket);
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(move || async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let guard = {
                let mut state = lock(&inner.state);
                if state.list_generation != ticket.generation || inner.cancel.is_cancelled() {
                    return;
                }
                let guard = LoadingGuard::acquire(&inner, &mut state, ticket.generation);
                inner.publish(&state);
                guard
            };
            drop(inner);
            run_fetch(weak, ticket, guard).await;
        });
    }

    /// Fetch the list for the current query even if it is already loaded.
    pub fn refetch_list(&self) {
        let mut state = lock(&self.inner.state);
        let query = state.latest_search_query.clone();
        let ticket = state.issue(query);
        spawn_fetch(&self.inner, &mut state, ticket);
        self.inner.publish(&state);
    }

    /// Deliver keyboard changes queued by `defer_keyboard_change`.
    pub fn flush_deferred(&self) -> usize {
        lock(&self.inner.state)
            .core
            .flush_deferred(&self.inner.changes)
    }

    /// Cancel pending debounced work and in-flight fetches. Later
    /// responses are dropped.
    pub fn close(&self) {
        self.inner.debouncer.cancel_pending();
        self.inner.cancel.cancel();
    }

    // ── Prop updates ─────────────────────────────────────────────────

    /// The owner passed a (possibly) new value prop.
    pub async fn set_value(&self, value: impl Into<Value>) {
        let value = value.into();
        let (ticket, source) = {
            let mut state = lock(&self.inner.state);
            state.core.props.value = value.clone();
            if !value.is_controlled()
                || !has_different_latest_and_previous_value(&value, &state.core.last_value)
            {
                return;
            }
            state.begin_resolve(&value)
        };
        self.resolve(value, ticket, source).await;
    }

    /// The owner passed a (possibly) new source. Only a different source
    /// identity counts as a change.
    pub async fn set_list_source(&self, source: AsyncList) {
        let pending = {
            let mut state = lock(&self.inner.state);
            if state.source.same_source(&source) {
                return;
            }
            debug!("option source replaced");
            state.source = source;
            state.loaded_query = None;

            if state.core.state.is_menu_open {
                let query = state.latest_search_query.clone();
                let ticket = state.issue(query);
                spawn_fetch(&self.inner, &mut state, ticket);
            }
            self.inner.publish(&state);

            if state.core.is_controlled() {
                let value = state.core.props.value.clone();
                let (ticket, source) = state.begin_resolve(&value);
                Some((value, ticket, source))
            } else {
                None
            }
        };
        if let Some((value, ticket, source)) = pending {
            self.resolve(value, ticket, source).await;
        }
    }

    /// Look up every selected value missing from the visible list, then
    /// derive selected options. Fetched options only label the selection.
    async fn resolve(&self, value: Value, ticket: u64, source: AsyncList) {
        let known = Arc::clone(&lock(&self.inner.state).list);
        let missing: Vec<&OptionValue> = value
            .identifiers()
            .iter()
            .filter(|id| !is_invalid_value(Some(*id)) && !known.iter().any(|o| o.value == **id))
            .collect();

        let lookups = missing.iter().map(|id| {
            let query = id.to_string();
            let fetch = source.fetch(query.clone());
            async move { (query, fetch.await) }
        });
        let results = join_all(lookups).await;

        let mut fetched = Vec::new();
        for (query, result) in results {
            match result {
                Ok(items) => fetched.extend(flatten_list(&items)),
                Err(err) => {
                    self.inner
                        .report_failure(FetchKind::SelectedOptions, &query, ticket, &err);
                }
            }
        }

        let mut state = lock(&self.inner.state);
        if state.resolve_generation != ticket
            || self.inner.cancel.is_cancelled()
            || has_different_latest_and_previous_value(&value, &state.core.last_value)
        {
            debug!(generation = ticket, "discarding superseded value resolution");
            return;
        }
        let mut lookup = state.list.to_vec();
        lookup.extend(fetched);
        state.core.reconcile(
            &value,
            &lookup,
            self.inner.options.diagnostics.as_ref(),
            &self.inner.options.config,
        );
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

    /// The visible (most recently fetched) list.
    pub fn list(&self) -> Arc<[SelectOption]> {
        Arc::clone(&lock(&self.inner.state).list)
    }

    pub fn state(&self) -> SelectState {
        lock(&self.inner.state).core.state
    }

    pub fn is_fetching_list(&self) -> bool {
        lock(&self.inner.state).is_fetching_list()
    }
}
