use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use super::{checkbox, ItemRow, TITLE_BANNER};
use crate::api::TodoApi;
use crate::error::ClientError;
use crate::routes::Route;
use crate::store::{Status, StoreState, TodoStore};

pub struct ListView<A> {
    store: Arc<TodoStore<A>>,
    state: watch::Receiver<StoreState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRender {
    Loading,
    Failed(String),
    Empty,
    Rows(Vec<RowRender>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRender {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub completed: bool,
    pub link: Route,
}

impl<A: TodoApi + 'static> ListView<A> {
    /// Subscribes without fetching; renders `Loading` until the store has
    /// a collection.
    pub fn new(store: Arc<TodoStore<A>>) -> Self {
        let state = store.subscribe();
        ListView { store, state }
    }

    /// Subscribes and fetches the list, as mounting the page does. A failed
    /// fetch is part of the render, not an error of mounting.
    pub async fn mount(store: Arc<TodoStore<A>>) -> Self {
        let view = ListView::new(store);
        let _ = view.store.fetch_all().await;
        view
    }

    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.store.fetch_all().await
    }

    /// Waits for the store to publish a new state.
    pub async fn changed(&mut self) {
        // The view keeps the store, and with it the sender, alive.
        let _ = self.state.changed().await;
    }

    pub fn render(&self) -> ListRender {
        let state = self.state.borrow();
        match state.status() {
            Status::Loading => ListRender::Loading,
            Status::Failed(err) => ListRender::Failed(err.to_string()),
            Status::Ready([]) => ListRender::Empty,
            Status::Ready(todos) => ListRender::Rows(
                todos
                    .iter()
                    .map(|todo| RowRender {
                        id: todo.id,
                        title: todo.title.clone(),
                        content: todo.content.clone(),
                        completed: todo.completed,
                        link: Route::detail(todo.id, todo.completed),
                    })
                    .collect(),
            ),
        }
    }

    /// One interactive row per todo, in collection order.
    pub fn rows(&self) -> Vec<ItemRow<A>> {
        let state = self.state.borrow();
        match &state.collection {
            Some(todos) => todos
                .iter()
                .map(|todo| ItemRow::new(Arc::clone(&self.store), todo))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn row(&self, id: i64) -> Option<ItemRow<A>> {
        let state = self.state.borrow();
        state
            .find(id)
            .map(|todo| ItemRow::new(Arc::clone(&self.store), todo))
    }
}

impl fmt::Display for ListRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE_BANNER}")?;
        match self {
            ListRender::Loading => writeln!(f, "Loading..."),
            ListRender::Failed(msg) => writeln!(f, "Error: {msg}"),
            ListRender::Empty => writeln!(f, "Nothing to do."),
            ListRender::Rows(rows) => rows.iter().try_for_each(|row| writeln!(f, "{row}")),
        }
    }
}

impl fmt::Display for RowRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {}: {}  ({})",
            checkbox(self.completed),
            self.id,
            self.title,
            self.content,
            self.link
        )
    }
}
