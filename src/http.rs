use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

/// JSON transport pinned to one base URL.
///
/// One call is one request: no retries, no caching, transport-default
/// timeouts.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;

        Ok(HttpClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "Sending request");
        self.client.request(method, self.url(path))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = send(self.request(Method::GET, path)).await?;
        Ok(resp.json().await?)
    }

    /// Any 2xx counts as success. The response body is returned only if it
    /// is JSON; empty or other bodies come back as `None`.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Option<Value>, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let resp = send(self.request(Method::POST, path).json(body)).await?;
        Ok(json_body(resp).await)
    }

    /// Same body handling as [`HttpClient::post`].
    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<Option<Value>, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let resp = send(self.request(Method::PATCH, path).json(body)).await?;
        Ok(json_body(resp).await)
    }

    /// The response body, if any, is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

async fn send(req: RequestBuilder) -> Result<Response, ClientError> {
    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();
    debug!(status = status.as_u16(), %message, "Request failed");

    Err(ClientError::HttpStatus {
        status: status.as_u16(),
        message,
    })
}

async fn json_body(resp: Response) -> Option<Value> {
    let bytes = resp.bytes().await.ok()?;
    parse_json(&bytes)
}

fn parse_json(bytes: &[u8]) -> Option<Value> {
    serde_json::from_slice(bytes).ok()
}

/// Pulls a human readable message out of an error body: a JSON `error` or
/// `message` field, or the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            match value.get(key) {
                Some(Value::String(msg)) => return Some(msg.clone()),
                Some(Value::Array(msgs)) => {
                    let joined: Vec<&str> = msgs.iter().filter_map(Value::as_str).collect();
                    if !joined.is_empty() {
                        return Some(joined.join(", "));
                    }
                }
                _ => {}
            }
        }
    }
    Some(body.to_string())
}
