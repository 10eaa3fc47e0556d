use std::fmt;

/// Everything that can go wrong between a view and the remote todo service.
///
/// Variants carry owned strings rather than source errors so a failure can be
/// cloned into the published store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response.
    Network(String),
    /// The service answered with a non-2xx status.
    HttpStatus { status: u16, message: String },
    /// A 2xx body that is not the JSON we expected.
    Decode(String),
    /// No todo with this id in the local collection.
    NotFound(i64),
    /// The collection has not been fetched yet.
    NotLoaded,
    /// Input rejected before it reached the store.
    Validation(&'static str),
    InvalidRoute(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(cause) => write!(f, "network error: {cause}"),
            ClientError::HttpStatus { status, message } => {
                write!(f, "server responded {status}: {message}")
            }
            ClientError::Decode(cause) => write!(f, "unexpected response: {cause}"),
            ClientError::NotFound(id) => write!(f, "todo {id} not found"),
            ClientError::NotLoaded => f.write_str("todos are still loading"),
            ClientError::Validation(msg) => f.write_str(msg),
            ClientError::InvalidRoute(route) => write!(f, "no such route: {route}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
