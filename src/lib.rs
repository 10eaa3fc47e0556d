pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod routes;
pub mod store;
pub mod views;

use std::sync::Arc;

use api::RestTodoApi;
use config::Config;
use error::ClientError;
use http::HttpClient;
use store::TodoStore;

pub type RestStore = TodoStore<RestTodoApi>;

/// Builds the one store the application shares between its views.
pub fn connect(config: &Config) -> Result<Arc<RestStore>, ClientError> {
    let http = HttpClient::new(&config.api_url)?;
    tracing::info!(api_url = %config.api_url, "Using todo service");
    Ok(Arc::new(TodoStore::new(RestTodoApi::new(http))))
}
