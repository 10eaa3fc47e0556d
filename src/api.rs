use std::future::Future;

use serde_json::Value;
use tracing::info;

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::models::{NewTodo, Todo, TodoPatch};

/// The remote todo resource, one method per endpoint.
pub trait TodoApi: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Todo>, ClientError>> + Send;

    fn create(&self, todo: &NewTodo) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn update(
        &self,
        id: i64,
        patch: &TodoPatch,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// [`TodoApi`] over the service's REST endpoints.
#[derive(Debug, Clone)]
pub struct RestTodoApi {
    http: HttpClient,
}

impl RestTodoApi {
    pub fn new(http: HttpClient) -> Self {
        RestTodoApi { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

impl TodoApi for RestTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let body: Value = self.http.get("/todo").await?;
        let todos = unwrap_collection(body)?;
        info!(count = todos.len(), "Listed todos");
        Ok(todos)
    }

    async fn create(&self, todo: &NewTodo) -> Result<(), ClientError> {
        let created = self.http.post("/todo", todo).await?;
        let id = created.as_ref().and_then(|body| body.get("id")).and_then(Value::as_i64);
        info!(?id, title = %todo.title, "Created todo");
        Ok(())
    }

    async fn update(&self, id: i64, patch: &TodoPatch) -> Result<(), ClientError> {
        self.http.patch(&format!("/todo/{id}"), patch).await?;
        info!(id, ?patch, "Updated todo");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.http.delete(&format!("/todo/{id}")).await?;
        info!(id, "Deleted todo");
        Ok(())
    }
}

/// `GET /todo` answers with a wrapper whose first element is the todo array
/// (`[[...todos], count]`).
fn unwrap_collection(body: Value) -> Result<Vec<Todo>, ClientError> {
    match body {
        Value::Array(mut parts) if !parts.is_empty() => {
            Ok(serde_json::from_value(parts.swap_remove(0))?)
        }
        other => Err(ClientError::Decode(format!(
            "expected a collection wrapper, got {other}"
        ))),
    }
}
