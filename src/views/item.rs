use std::future::Future;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::api::TodoApi;
use crate::error::ClientError;
use crate::models::{Todo, TodoPatch};
use crate::routes::Route;
use crate::store::TodoStore;

#[derive(Debug, Clone)]
struct RowState {
    editing: bool,
    title: String,
    content: String,
    checked: bool,
}

/// One todo in the list with its own edit mode and checkbox.
///
/// The futures returned by [`submit_edit`](Self::submit_edit) and
/// [`toggle`](Self::toggle) only hold a weak reference to the row, so the
/// row can be dropped while they are in flight.
pub struct ItemRow<A> {
    id: i64,
    store: Arc<TodoStore<A>>,
    local: Arc<Mutex<RowState>>,
}

impl<A: TodoApi + 'static> ItemRow<A> {
    pub fn new(store: Arc<TodoStore<A>>, todo: &Todo) -> Self {
        ItemRow {
            id: todo.id,
            store,
            local: Arc::new(Mutex::new(RowState {
                editing: false,
                title: todo.title.clone(),
                content: todo.content.clone(),
                checked: todo.completed,
            })),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_editing(&self) -> bool {
        lock(&self.local).editing
    }

    pub fn is_checked(&self) -> bool {
        lock(&self.local).checked
    }

    /// Current draft `(title, content)`.
    pub fn draft(&self) -> (String, String) {
        let local = lock(&self.local);
        (local.title.clone(), local.content.clone())
    }

    pub fn begin_edit(&self) {
        lock(&self.local).editing = true;
    }

    pub fn set_title(&self, title: impl Into<String>) {
        lock(&self.local).title = title.into();
    }

    pub fn set_content(&self, content: impl Into<String>) {
        lock(&self.local).content = content.into();
    }

    /// Leaves edit mode, resetting the drafts to the store's copy.
    pub fn cancel_edit(&self) {
        let current = self.store.find(self.id);
        let mut local = lock(&self.local);
        local.editing = false;
        if let Some(todo) = current {
            local.title = todo.title;
            local.content = todo.content;
        }
    }

    /// Sends the drafts as an update. Blank drafts fail validation here and
    /// never reach the store.
    pub fn submit_edit(&self) -> impl Future<Output = Result<(), ClientError>> + Send + 'static {
        let (title, content) = self.draft();
        let id = self.id;
        let store = Arc::clone(&self.store);
        let local = Arc::downgrade(&self.local);

        async move {
            if title.trim().is_empty() || content.trim().is_empty() {
                return Err(ClientError::Validation("title and content are both required"));
            }
            store.update(id, TodoPatch::text(title, content)).await?;
            if let Some(local) = local.upgrade() {
                lock(&local).editing = false;
            }
            Ok(())
        }
    }

    /// Flips the checkbox right away, then asks the store to flip the todo.
    /// The checkbox flips back if the store reports a failure.
    pub fn toggle(&self) -> impl Future<Output = Result<(), ClientError>> + Send + 'static {
        let previous = {
            let mut local = lock(&self.local);
            let previous = local.checked;
            local.checked = !previous;
            previous
        };
        let id = self.id;
        let store = Arc::clone(&self.store);
        let local = Arc::downgrade(&self.local);

        async move {
            let result = store.toggle_complete(id, previous).await;
            if result.is_err() {
                if let Some(local) = local.upgrade() {
                    lock(&local).checked = previous;
                }
            }
            result
        }
    }

    pub fn delete(&self) -> impl Future<Output = Result<(), ClientError>> + Send + 'static {
        let id = self.id;
        let store = Arc::clone(&self.store);
        async move { store.delete(id).await }
    }

    /// Detail route carrying this row's checkbox state.
    pub fn link(&self) -> Route {
        Route::detail(self.id, self.is_checked())
    }
}
