use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const API_URL_VAR: &str = "TODO_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the todo service, without a trailing `/`.
    pub api_url: String,
}

impl Config {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        let api_url = api_url.trim().trim_end_matches('/');
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ClientError::Validation(
                "api url must start with http:// or https://",
            ));
        }
        Ok(Config {
            api_url: api_url.to_string(),
        })
    }

    /// Reads `TODO_API_URL`, falling back to the local development server.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = std::env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Config::new(&api_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
