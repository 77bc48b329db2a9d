// ── Async option source ──
//
// An `AsyncList` wraps the caller's `query -> future<list>` function.
// Cloning shares the function; two sources are "the same list" only when
// they share it, which is how controllers detect a new source.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::SelectError;
use crate::model::ListItem;

/// Future returned by an [`AsyncList`].
pub type ListFuture = BoxFuture<'static, Result<Vec<ListItem>, SelectError>>;

type ListFn = dyn Fn(String) -> ListFuture + Send + Sync;

/// Option list supplied as a query function.
#[derive(Clone)]
pub struct AsyncList {
    fetch: Arc<ListFn>,
}

impl AsyncList {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<ListItem>, SelectError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move |query: String| -> ListFuture { Box::pin(fetch(query)) }),
        }
    }

    /// Start a fetch for `query`.
    pub fn fetch(&self, query: impl Into<String>) -> ListFuture {
        (self.fetch)(query.into())
    }

    /// Identity comparison: `true` only for clones of the same source.
    pub fn same_source(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.fetch), Arc::as_ptr(&other.fetch))
    }
}

impl fmt::Debug for AsyncList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncList").finish_non_exhaustive()
    }
}
