use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// Client-side routes: `/` and `/todo/:id?checked={bool}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(DetailRoute),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRoute {
    pub id: i64,
    /// The raw `checked` query value, kept verbatim so navigation reproduces
    /// exactly what it was given.
    pub checked: Option<String>,
}

impl DetailRoute {
    pub fn new(id: i64, checked: bool) -> Self {
        DetailRoute {
            id,
            checked: Some(checked.to_string()),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked.as_deref() == Some("true")
    }
}

impl Route {
    pub fn detail(id: i64, checked: bool) -> Self {
        Route::Detail(DetailRoute::new(id, checked))
    }

    pub fn parse(s: &str) -> Result<Self, ClientError> {
        let invalid = || ClientError::InvalidRoute(s.to_string());
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();
        match segments.as_slice() {
            [] => Ok(Route::List),
            ["todo", id] => {
                let id = id.parse().map_err(|_| invalid())?;
                let checked = query.and_then(|q| query_value(q, "checked"));
                Ok(Route::Detail(DetailRoute { id, checked }))
            }
            _ => Err(invalid()),
        }
    }
}

fn query_value(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (k == key).then(|| v.to_string())
    })
}

impl FromStr for Route {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => f.write_str("/"),
            Route::Detail(detail) => write!(f, "{detail}"),
        }
    }
}

impl fmt::Display for DetailRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/todo/{}", self.id)?;
        if let Some(checked) = &self.checked {
            write!(f, "?checked={checked}")?;
        }
        Ok(())
    }
}
