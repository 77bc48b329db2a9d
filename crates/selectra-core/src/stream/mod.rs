// ── Snapshot streams ──
//
// Controllers publish an immutable `SelectSnapshot` after every change.
// The presentation layer subscribes through `SelectStream`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use serde::Serialize;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::machine::SelectState;
use crate::model::{SelectAllState, SelectOption, SelectedOptions};

/// Everything the presentation layer needs to draw the control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectSnapshot {
    /// Options to show in the dropdown (filtered or fetched).
    pub list: Arc<[SelectOption]>,
    pub selected_options: Option<SelectedOptions>,
    pub input_value: String,
    pub is_fetching_list: bool,
    pub state: SelectState,
    pub select_all: SelectAllState,
    /// Alert from the most recent failed fetch, cleared on success.
    pub error: Option<String>,
}

impl Default for SelectSnapshot {
    fn default() -> Self {
        Self {
            list: Arc::from(Vec::new()),
            selected_options: None,
            input_value: String::new(),
            is_fetching_list: false,
            state: SelectState::default(),
            select_all: SelectAllState::default(),
            error: None,
        }
    }
}

/// A subscription to a controller's snapshots.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct SelectStream {
    current: Arc<SelectSnapshot>,
    receiver: watch::Receiver<Arc<SelectSnapshot>>,
}

impl SelectStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<SelectSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<SelectSnapshot> {
        &self.current
    }

    /// Latest published snapshot.
    pub fn latest(&self) -> Arc<SelectSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publish. Returns `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<Arc<SelectSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> SelectWatchStream {
        SelectWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SelectWatchStream {
    inner: WatchStream<Arc<SelectSnapshot>>,
}

impl Stream for SelectWatchStream {
    type Item = Arc<SelectSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
