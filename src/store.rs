//! Client-side todo state.
//!
//! [`TodoStore`] owns the cached collection and is the only writer of it.
//! Every change is published on a `watch` channel so any number of views can
//! re-render from the latest [`StoreState`].
//!
//! Updates are optimistic: the merged todo is published before the request
//! goes out and the pre-request snapshot is restored if it fails. Creates and
//! deletes are not optimistic; they wait for the re-fetch that follows every
//! successful mutation.
//!
//! A failed update is followed by a re-fetch as well, so changes confirmed
//! for other todos while it was in flight are not lost to the rollback.
//!
//! Overlapping updates to the same id are not serialized. Each one rolls back
//! to the snapshot taken right before it started, and whichever re-fetch
//! completes last defines the collection.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::TodoApi;
use crate::error::ClientError;
use crate::models::{NewTodo, Todo, TodoPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// `None` until the first fetch succeeds.
    pub collection: Option<Vec<Todo>>,
    /// True while at least one fetch is in flight.
    pub loading: bool,
    pub error: Option<ClientError>,
}

/// What a view should show for one [`StoreState`]. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Loading,
    Failed(&'a ClientError),
    Ready(&'a [Todo]),
}

impl StoreState {
    pub fn status(&self) -> Status<'_> {
        match (&self.error, &self.collection) {
            (Some(err), _) => Status::Failed(err),
            (None, Some(todos)) => Status::Ready(todos),
            (None, None) => Status::Loading,
        }
    }

    pub fn find(&self, id: i64) -> Option<&Todo> {
        self.collection.as_ref()?.iter().find(|todo| todo.id == id)
    }
}

pub struct TodoStore<A> {
    api: A,
    state: watch::Sender<StoreState>,
    fetches: AtomicUsize,
}

impl<A: TodoApi> TodoStore<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        TodoStore {
            api,
            state,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn collection(&self) -> Option<Vec<Todo>> {
        self.state.borrow().collection.clone()
    }

    pub fn find(&self, id: i64) -> Option<Todo> {
        self.state.borrow().find(id).cloned()
    }

    /// Replaces the collection with the server's list. On failure the
    /// previous collection, if any, stays published next to the error.
    pub async fn fetch_all(&self) -> Result<(), ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| state.loading = true);

        let result = self.api.list().await;
        let loading = self.fetches.fetch_sub(1, Ordering::SeqCst) > 1;

        match result {
            Ok(todos) => {
                debug!(count = todos.len(), "Fetched todos");
                self.state.send_modify(|state| {
                    state.collection = Some(todos);
                    state.loading = loading;
                    state.error = None;
                });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Fetching todos failed");
                self.state.send_modify(|state| {
                    state.loading = loading;
                    state.error = Some(err.clone());
                });
                Err(err)
            }
        }
    }

    /// Creates a todo and re-fetches. The arguments are sent as given; input
    /// validation belongs to the caller.
    pub async fn create(&self, title: &str, content: &str) -> Result<(), ClientError> {
        let todo = NewTodo {
            title: title.to_string(),
            content: content.to_string(),
        };
        if let Err(err) = self.api.create(&todo).await {
            self.record_failure("create", None, err.clone());
            return Err(err);
        }
        self.refetch().await;
        Ok(())
    }

    /// Publishes `patch` merged into todo `id` immediately, then sends it.
    /// A failed request restores the collection exactly as it was before
    /// this call, then re-fetches; the update's error stays published.
    pub async fn update(&self, id: i64, patch: TodoPatch) -> Result<(), ClientError> {
        let snapshot = self.apply_optimistic(id, &patch);

        match self.api.update(id, &patch).await {
            Ok(()) => {
                self.refetch().await;
                Ok(())
            }
            Err(err) => {
                self.rollback(snapshot, err.clone());
                warn!(id, error = %err, "Update failed, rolled back");
                if self.fetch_all().await.is_ok() {
                    self.state.send_modify(|state| state.error = Some(err.clone()));
                }
                Err(err)
            }
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        if let Err(err) = self.api.delete(id).await {
            self.record_failure("delete", Some(id), err.clone());
            return Err(err);
        }
        self.refetch().await;
        Ok(())
    }

    pub async fn toggle_complete(&self, id: i64, current_checked: bool) -> Result<(), ClientError> {
        self.update(id, TodoPatch::completed(!current_checked)).await
    }

    /// Invalidates the cached collection after a successful mutation. The
    /// mutation already happened server-side, so a failed re-fetch is only
    /// published, not returned.
    async fn refetch(&self) {
        let _ = self.fetch_all().await;
    }

    /// Publishes the optimistic collection and returns the one it replaced.
    fn apply_optimistic(&self, id: i64, patch: &TodoPatch) -> Option<Vec<Todo>> {
        let mut snapshot = None;
        self.state.send_modify(|state| {
            snapshot = state.collection.clone();
            if let Some(todos) = &state.collection {
                let merged = todos
                    .iter()
                    .map(|todo| if todo.id == id { patch.apply(todo) } else { todo.clone() })
                    .collect();
                state.collection = Some(merged);
            }
        });
        snapshot
    }

    fn rollback(&self, snapshot: Option<Vec<Todo>>, err: ClientError) {
        self.state.send_modify(|state| {
            state.collection = snapshot;
            state.error = Some(err);
        });
    }

    fn record_failure(&self, op: &'static str, id: Option<i64>, err: ClientError) {
        warn!(op, ?id, error = %err, "Mutation failed");
        self.state.send_modify(|state| state.error = Some(err));
    }
}
