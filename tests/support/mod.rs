//! In-process stand-in for the remote todo service: axum over an in-memory
//! SQLite table, speaking the same wire format as the real backend.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use rusqlite::{Connection, Row};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use todo_client::api::RestTodoApi;
use todo_client::http::HttpClient;
use todo_client::models::Todo;
use todo_client::store::TodoStore;
use todo_client::RestStore;

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

pub type Db = Arc<Mutex<Connection>>;

/// Switches that make the next matching request answer 500.
#[derive(Default)]
pub struct Faults {
    pub list: AtomicBool,
    pub patch: AtomicBool,
    pub delete: AtomicBool,
    /// While set, POST answers `201` with a plain-text body and PATCH
    /// answers `204` with none.
    pub bare_mutations: AtomicBool,
}

impl Faults {
    fn take(flag: &AtomicBool) -> bool {
        flag.swap(false, Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct ServiceState {
    db: Db,
    faults: Arc<Faults>,
}

pub struct TestService {
    pub addr: String,
    pub db: Db,
    pub faults: Arc<Faults>,
}

impl TestService {
    pub async fn start() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
        conn.execute_batch(&format!(
            "
            CREATE TABLE todos (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT ({NOW}),
                updated_at TEXT NOT NULL DEFAULT ({NOW})
            );
            "
        ))
        .expect("Failed to create tables");

        let db = Arc::new(Mutex::new(conn));
        let faults = Arc::new(Faults::default());
        let state = ServiceState {
            db: Arc::clone(&db),
            faults: Arc::clone(&faults),
        };

        let app = Router::new()
            .route("/todo", get(list_todos).post(create_todo))
            .route("/todo/{id}", patch(update_todo).delete(delete_todo))
            .layer(tower::ServiceBuilder::new().layer(tower_http::trace::TraceLayer::new_for_http()))
            .with_state(state);

        // Bind to random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestService { addr, db, faults }
    }

    pub fn store(&self) -> Arc<RestStore> {
        let http = HttpClient::new(&self.addr).expect("Failed to create client");
        Arc::new(TodoStore::new(RestTodoApi::new(http)))
    }

    pub fn seed(&self, title: &str, content: &str, completed: bool) -> i64 {
        let conn = self.db.lock().unwrap();
        conn.execute(
            "INSERT INTO todos (title, content, completed) VALUES (?1, ?2, ?3)",
            (title, content, completed as i32),
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    /// The service's authoritative state, decoded the way the client does.
    pub fn todos(&self) -> Vec<Todo> {
        let conn = self.db.lock().unwrap();
        serde_json::from_value(Value::Array(select_all(&conn).unwrap())).unwrap()
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    addr
}

enum ServiceError {
    NotFound,
    BadRequest(&'static str),
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServiceError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = json!({ "statusCode": status.as_u16(), "message": message });
        (status, Json(body)).into_response()
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

#[derive(Deserialize)]
struct CreateTodo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct UpdateTodo {
    title: Option<String>,
    content: Option<String>,
    completed: Option<bool>,
}

fn row_to_json(row: &Row<'_>) -> rusqlite::Result<Value> {
    Ok(json!({
        "id": row.get::<_, i64>(0)?,
        "title": row.get::<_, String>(1)?,
        "content": row.get::<_, String>(2)?,
        "completed": row.get::<_, i32>(3)? != 0,
        "createdAt": row.get::<_, String>(4)?,
        "updatedAt": row.get::<_, String>(5)?,
    }))
}

const COLUMNS: &str = "id, title, content, completed, created_at, updated_at";

fn select_all(conn: &Connection) -> rusqlite::Result<Vec<Value>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM todos ORDER BY id ASC"))?;
    let todos = stmt
        .query_map([], row_to_json)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(todos)
}

fn select_one(conn: &Connection, id: i64) -> rusqlite::Result<Option<Value>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_json(row)?)),
        None => Ok(None),
    }
}

async fn list_todos(State(state): State<ServiceState>) -> Result<Json<Value>, ServiceError> {
    if Faults::take(&state.faults.list) {
        return Err(ServiceError::Internal("injected list failure".into()));
    }
    let conn = state.db.lock().unwrap();
    let todos = select_all(&conn)?;
    let count = todos.len();
    Ok(Json(json!([todos, count])))
}

async fn create_todo(
    State(state): State<ServiceState>,
    Json(req): Json<CreateTodo>,
) -> Result<Response, ServiceError> {
    if req.title.trim().is_empty() {
        return Err(ServiceError::BadRequest("title should not be empty"));
    }
    if req.content.trim().is_empty() {
        return Err(ServiceError::BadRequest("content should not be empty"));
    }

    let conn = state.db.lock().unwrap();
    conn.execute(
        "INSERT INTO todos (title, content) VALUES (?1, ?2)",
        (&req.title, &req.content),
    )?;
    let todo = select_one(&conn, conn.last_insert_rowid())?.ok_or(ServiceError::NotFound)?;
    if state.faults.bare_mutations.load(Ordering::SeqCst) {
        return Ok((StatusCode::CREATED, "Created").into_response());
    }
    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

async fn update_todo(
    State(state): State<ServiceState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodo>,
) -> Result<Response, ServiceError> {
    if Faults::take(&state.faults.patch) {
        return Err(ServiceError::Internal("injected patch failure".into()));
    }

    let conn = state.db.lock().unwrap();
    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(title) = req.title {
        updates.push("title = ?");
        params.push(Box::new(title));
    }
    if let Some(content) = req.content {
        updates.push("content = ?");
        params.push(Box::new(content));
    }
    if let Some(completed) = req.completed {
        updates.push("completed = ?");
        params.push(Box::new(completed as i32));
    }

    if !updates.is_empty() {
        let query = format!(
            "UPDATE todos SET {}, updated_at = {NOW} WHERE id = ?",
            updates.join(", ")
        );
        params.push(Box::new(id));
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        conn.execute(&query, params_refs.as_slice())?;
    }

    let todo = select_one(&conn, id)?.ok_or(ServiceError::NotFound)?;
    if state.faults.bare_mutations.load(Ordering::SeqCst) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(todo).into_response())
}

async fn delete_todo(
    State(state): State<ServiceState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    if Faults::take(&state.faults.delete) {
        return Err(ServiceError::Internal("injected delete failure".into()));
    }
    let conn = state.db.lock().unwrap();
    if conn.execute("DELETE FROM todos WHERE id = ?1", [id])? > 0 {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::NotFound)
    }
}
