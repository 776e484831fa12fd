//! Request issuers for the retrieval engine

use super::client::{HttpClient, RequestConfig};
use super::response::PageResponse;
use crate::error::Result;
use crate::pagination::PageRequest;
use crate::types::Method;
use async_trait::async_trait;
use serde_json::Value;

/// Issues the HTTP request for one page descriptor.
///
/// Implementations return the response whatever its status; classifying
/// 429s and failures is up to the engine.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse>;
}

/// Fetcher bound to one endpoint of an `HttpClient`.
///
/// Link descriptors are sent as-is. Cursor descriptors are sent to the bound
/// URL with the token in `cursor_param`.
#[derive(Debug)]
pub struct EndpointFetcher<'a> {
    client: &'a HttpClient,
    url: String,
    method: Method,
    body: Option<Value>,
    cursor_param: String,
}

impl<'a> EndpointFetcher<'a> {
    /// GET fetcher for an endpoint
    pub fn new(client: &'a HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            method: Method::GET,
            body: None,
            cursor_param: "pageToken".to_string(),
        }
    }

    /// Use a different HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Send this JSON body with every page request
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Query parameter carrying cursor descriptors
    #[must_use]
    pub fn cursor_param(mut self, param: impl Into<String>) -> Self {
        self.cursor_param = param.into();
        self
    }

    /// First page descriptor for this endpoint
    pub fn first_page(&self) -> PageRequest {
        PageRequest::url(self.url.clone())
    }
}

#[async_trait]
impl PageFetcher for EndpointFetcher<'_> {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse> {
        let (url, config) = match request {
            PageRequest::Link { url, params } => {
                (url.as_str(), RequestConfig::new().query_params(params.clone()))
            }
            PageRequest::Cursor(token) => (
                self.url.as_str(),
                RequestConfig::new().query(self.cursor_param.clone(), token.clone()),
            ),
        };

        let config = match &self.body {
            Some(body) => config.json(body.clone()),
            None => config,
        };

        self.client.send(self.method, url, config).await
    }
}
