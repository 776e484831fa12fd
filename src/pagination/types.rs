//! Pagination types and traits
//!
//! Defines the page descriptor handed between the retrieval engine and the
//! vendor-specific strategies.

use crate::http::PageResponse;
use crate::types::QueryParams;
use serde_json::Value;

/// Describes how to fetch one page.
///
/// Two descriptors compare equal when they would issue the same request,
/// which is what the engine's stall guard relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// A URL (absolute or relative to the client base URL) plus query parameters
    Link {
        /// Target URL
        url: String,
        /// Query parameters sent with the request
        params: QueryParams,
    },
    /// A bare continuation token; the fetcher knows the endpoint
    Cursor(String),
}

impl PageRequest {
    /// Request a URL without parameters
    pub fn url(url: impl Into<String>) -> Self {
        Self::Link {
            url: url.into(),
            params: QueryParams::new(),
        }
    }

    /// Request a URL with parameters
    pub fn with_params(url: impl Into<String>, params: QueryParams) -> Self {
        Self::Link {
            url: url.into(),
            params,
        }
    }

    /// Continuation token descriptor
    pub fn cursor(token: impl Into<String>) -> Self {
        Self::Cursor(token.into())
    }

    /// Add or replace a query parameter (no-op for cursors)
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        if let Self::Link { params, .. } = &mut self {
            params.insert(key.into(), value.to_string());
        }
        self
    }

    /// Add a query parameter only when a value is present
    #[must_use]
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// URL of a link descriptor
    pub fn link_url(&self) -> Option<&str> {
        match self {
            Self::Link { url, .. } => Some(url),
            Self::Cursor(_) => None,
        }
    }

    /// Query parameters of a link descriptor
    pub fn params(&self) -> Option<&QueryParams> {
        match self {
            Self::Link { params, .. } => Some(params),
            Self::Cursor(_) => None,
        }
    }
}

impl std::fmt::Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Link { url, params } if params.is_empty() => write!(f, "{url}"),
            Self::Link { url, params } => {
                let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{url}?{}", query.join("&"))
            }
            Self::Cursor(token) => write!(f, "cursor:{token}"),
        }
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available
    Continue(PageRequest),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// Convert into the next descriptor, if any
    pub fn into_request(self) -> Option<PageRequest> {
        match self {
            Self::Continue(request) => Some(request),
            Self::Done => None,
        }
    }
}

impl From<Option<PageRequest>> for NextPage {
    fn from(request: Option<PageRequest>) -> Self {
        request.map_or(Self::Done, Self::Continue)
    }
}

/// Core trait for pagination strategies.
///
/// Called once per successful page with the descriptor that produced it.
pub trait Paginator: Send + Sync {
    /// Compute the descriptor for the page after `current`
    fn next_page(&self, current: &PageRequest, response: &PageResponse) -> NextPage;
}

/// Look up a field for pagination purposes.
///
/// An exact top-level key wins (vendor keys like `@odata.nextLink` contain
/// dots); otherwise the path is walked as dot-separated segments.
pub fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if let Some(value) = body.get(path) {
        return Some(value);
    }

    let mut current = body;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Look up a non-empty string field
pub fn lookup_str<'a>(body: &'a Value, path: &str) -> Option<&'a str> {
    lookup(body, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
