use std::sync::Arc;

use crate::api::TodoApi;
use crate::error::ClientError;
use crate::models::NewTodo;
use crate::store::TodoStore;

const CREATE_FAILED: &str = "could not add the todo";

/// The "new todo" form above the list.
pub struct TodoForm<A> {
    store: Arc<TodoStore<A>>,
    title: String,
    content: String,
    error: Option<&'static str>,
}

impl<A: TodoApi> TodoForm<A> {
    pub fn new(store: Arc<TodoStore<A>>) -> Self {
        TodoForm {
            store,
            title: String::new(),
            content: String::new(),
            error: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error
    }

    pub fn can_submit(&self) -> bool {
        !self.title.is_empty() && !self.content.is_empty()
    }

    /// Validates the drafts and hands them to the store. The drafts are
    /// cleared as soon as they pass validation.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let todo = match NewTodo::new(&self.title, &self.content) {
            Ok(todo) => todo,
            Err(err) => {
                if let ClientError::Validation(msg) = err {
                    self.error = Some(msg);
                }
                return Err(err);
            }
        };

        self.title.clear();
        self.content.clear();
        self.error = None;

        let result = self.store.create(&todo.title, &todo.content).await;
        if result.is_err() {
            self.error = Some(CREATE_FAILED);
        }
        result
    }
}
