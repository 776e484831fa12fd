//! Pagination strategy implementations
//!
//! One strategy per vendor pagination idiom.

use super::types::{lookup_str, NextPage, PageRequest, Paginator};
use crate::http::PageResponse;
use serde_json::Value;
use url::Url;

// ============================================================================
// Body Token Pagination
// ============================================================================

/// Opaque page token in the response body (Google APIs).
///
/// The token is merged into the *current* request's parameters, so filters
/// from the first request are carried forward.
/// Format: `{ "users": [...], "nextPageToken": "abc" }` → `?pageToken=abc`
#[derive(Debug, Clone)]
pub struct BodyTokenPaginator {
    /// Path of the token in the response body
    pub token_path: String,
    /// Query parameter the token is sent back in
    pub token_param: String,
}

impl Default for BodyTokenPaginator {
    fn default() -> Self {
        Self::new("nextPageToken", "pageToken")
    }
}

impl BodyTokenPaginator {
    /// Create a new body token paginator
    pub fn new(token_path: impl Into<String>, token_param: impl Into<String>) -> Self {
        Self {
            token_path: token_path.into(),
            token_param: token_param.into(),
        }
    }
}

impl Paginator for BodyTokenPaginator {
    fn next_page(&self, current: &PageRequest, response: &PageResponse) -> NextPage {
        let Some(token) = lookup_str(&response.body, &self.token_path) else {
            return NextPage::Done;
        };

        match current {
            PageRequest::Link { url, params } => {
                let mut params = params.clone();
                params.insert(self.token_param.clone(), token.to_string());
                NextPage::Continue(PageRequest::with_params(url.clone(), params))
            }
            PageRequest::Cursor(_) => NextPage::Continue(PageRequest::cursor(token)),
        }
    }
}

// ============================================================================
// Next URL Pagination
// ============================================================================

/// Next URL in the response body (Microsoft Graph `@odata.nextLink`).
///
/// The link is self-contained: parameters from the previous request are dropped.
#[derive(Debug, Clone)]
pub struct NextUrlPaginator {
    /// Path of the next URL in the response body
    pub path: String,
}

impl NextUrlPaginator {
    /// Create a new next URL paginator
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// OData `@odata.nextLink` convention
    pub fn odata() -> Self {
        Self::new("@odata.nextLink")
    }
}

impl Paginator for NextUrlPaginator {
    fn next_page(&self, current: &PageRequest, response: &PageResponse) -> NextPage {
        match lookup_str(&response.body, &self.path) {
            Some(next) => NextPage::Continue(PageRequest::url(resolve(current, next))),
            None => NextPage::Done,
        }
    }
}

// ============================================================================
// Link Header Pagination
// ============================================================================

/// Link header pagination (RFC 5988), as used by Okta.
///
/// Format: `Link: <https://x.okta.com/api/v1/users?after=00u1>; rel="next"`
#[derive(Debug, Clone)]
pub struct LinkHeaderPaginator {
    /// Rel value to follow (default: "next")
    pub rel: String,
    /// Treat an empty page as the end even if a next link is present
    pub stop_on_empty: bool,
}

impl Default for LinkHeaderPaginator {
    fn default() -> Self {
        Self::new("next")
    }
}

impl LinkHeaderPaginator {
    /// Create a new link header paginator
    pub fn new(rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            stop_on_empty: false,
        }
    }

    /// Stop at the first empty page.
    ///
    /// Polling streams such as the Okta System Log always link onward, so
    /// an empty page means the reader has caught up.
    #[must_use]
    pub fn stop_on_empty(mut self) -> Self {
        self.stop_on_empty = true;
        self
    }
}

fn is_empty_page(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

impl Paginator for LinkHeaderPaginator {
    fn next_page(&self, current: &PageRequest, response: &PageResponse) -> NextPage {
        if self.stop_on_empty && is_empty_page(&response.body) {
            return NextPage::Done;
        }

        // Okta may send one Link header per relation
        for value in response.headers.get_all("link") {
            let Ok(header) = value.to_str() else {
                continue;
            };
            if let Some(next) = parse_link_header(header, &self.rel) {
                return NextPage::Continue(PageRequest::url(resolve(current, &next)));
            }
        }
        NextPage::Done
    }
}

/// Parse a Link header and extract the URL for the given rel.
///
/// Targets are delimited by `<...>`, so commas inside a URL do not split it.
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    let mut rest = header;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let url = &after[..end];
        let tail = &after[end + 1..];

        let params_end = tail.find('<').unwrap_or(tail.len());
        let params = &tail[..params_end];

        let matched = params.split(';').any(|segment| {
            let segment = segment.trim().trim_end_matches(',').trim();
            segment
                .strip_prefix("rel=")
                .map(|v| v.trim_matches('"').trim_matches('\''))
                .is_some_and(|rels| rels.split_whitespace().any(|r| r == target_rel))
        });
        if matched {
            return Some(url.to_string());
        }

        rest = &tail[params_end..];
    }

    None
}

/// Resolve a possibly relative next link against the current request URL
fn resolve(current: &PageRequest, next: &str) -> String {
    let Some(base) = current.link_url().and_then(|u| Url::parse(u).ok()) else {
        return next.to_string();
    };
    match base.join(next) {
        Ok(url) => url.to_string(),
        Err(_) => next.to_string(),
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn next_page(&self, _current: &PageRequest, _response: &PageResponse) -> NextPage {
        NextPage::Done
    }
}
