use std::fmt;
use std::sync::Arc;

use time::OffsetDateTime;

use super::{checkbox, format_timestamp};
use crate::api::TodoApi;
use crate::error::ClientError;
use crate::routes::{DetailRoute, Route};
use crate::store::TodoStore;

/// A single todo, addressed by `/todo/:id?checked=...`.
pub struct DetailView<A> {
    store: Arc<TodoStore<A>>,
    route: DetailRoute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRender {
    Loading,
    Failed(String),
    NotFound(i64),
    Found(TodoCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoCard {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
    /// Taken from the route's `checked` flag, not from the todo.
    pub checked: bool,
}

impl<A: TodoApi> DetailView<A> {
    pub fn new(store: Arc<TodoStore<A>>, route: DetailRoute) -> Self {
        DetailView { store, route }
    }

    pub fn route(&self) -> &DetailRoute {
        &self.route
    }

    pub fn render(&self) -> DetailRender {
        let state = self.store.snapshot();
        if state.collection.is_none() {
            return match state.error {
                Some(err) => DetailRender::Failed(err.to_string()),
                None => DetailRender::Loading,
            };
        }

        match state.find(self.route.id) {
            Some(todo) => DetailRender::Found(TodoCard {
                id: todo.id,
                title: todo.title.clone(),
                content: todo.content.clone(),
                created_at: todo.created_at,
                updated_at: todo.updated_at,
                checked: self.route.is_checked(),
            }),
            None => DetailRender::NotFound(self.route.id),
        }
    }

    /// Flips the todo's completion through the store's optimistic update
    /// and returns where to navigate next: this todo, with `checked`
    /// reflecting the new value.
    pub async fn toggle(&self) -> Result<Route, ClientError> {
        let id = self.route.id;
        match self.store.snapshot().collection {
            None => return Err(ClientError::NotLoaded),
            Some(todos) if !todos.iter().any(|todo| todo.id == id) => {
                return Err(ClientError::NotFound(id));
            }
            Some(_) => {}
        }

        let checked = self.route.is_checked();
        self.store.toggle_complete(id, checked).await?;
        Ok(Route::detail(id, !checked))
    }
}

impl fmt::Display for DetailRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailRender::Loading => writeln!(f, "Loading..."),
            DetailRender::Failed(msg) => writeln!(f, "Error: {msg}"),
            DetailRender::NotFound(id) => writeln!(f, "Todo #{id} could not be found."),
            DetailRender::Found(card) => write!(f, "{card}"),
        }
    }
}

impl fmt::Display for TodoCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.id, self.title)?;
        writeln!(f, "{}", self.content)?;
        writeln!(f, "Created: {}", format_timestamp(self.created_at))?;
        writeln!(f, "Updated: {}", format_timestamp(self.updated_at))?;
        writeln!(f, "{} completed", checkbox(self.checked))
    }
}
