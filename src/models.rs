use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default, alias = "checked")]
    pub completed: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub content: String,
}

impl NewTodo {
    /// Builds a creation payload, rejecting blank fields.
    pub fn new(title: &str, content: &str) -> Result<Self, ClientError> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(ClientError::Validation("title and content are both required"));
        }
        Ok(NewTodo {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// Partial todo fields sent with `PATCH /todo/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        TodoPatch {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn text(title: impl Into<String>, content: impl Into<String>) -> Self {
        TodoPatch {
            title: Some(title.into()),
            content: Some(content.into()),
            completed: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.completed.is_none()
    }

    /// Returns `todo` with this patch merged over it. Server-maintained
    /// fields (`id`, timestamps) are left alone.
    pub fn apply(&self, todo: &Todo) -> Todo {
        Todo {
            title: self.title.clone().unwrap_or_else(|| todo.title.clone()),
            content: self.content.clone().unwrap_or_else(|| todo.content.clone()),
            completed: self.completed.unwrap_or(todo.completed),
            ..todo.clone()
        }
    }
}
