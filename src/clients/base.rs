//! Plumbing shared by every vendor client

use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::decode::RecordExtractor;
use crate::engine::{Retrieval, RetrievalEngine, RetrievalObserver, TerminationReason, TracingObserver};
use crate::error::{Error, Result};
use crate::http::{EndpointFetcher, HttpClient, PageFetcher};
use crate::pagination::{NoPaginator, PageRequest, Paginator};
use crate::types::{Method, QueryParams};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Whole response body as the only record (`{}` for an empty body)
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeBody;

impl RecordExtractor for WholeBody {
    fn extract(&self, body: &Value) -> Vec<Value> {
        match body {
            Value::Null => vec![Value::Object(Map::new())],
            other => vec![other.clone()],
        }
    }
}

/// HTTP client, settings and engine wiring for one vendor
pub struct ApiCore {
    http: HttpClient,
    settings: ClientSettings,
    observer: Option<Arc<dyn RetrievalObserver>>,
}

impl ApiCore {
    /// Build the HTTP client for `default_base_url`, unless settings override it
    pub fn new(settings: &ClientSettings, default_base_url: &str, auth: AuthConfig) -> Result<Self> {
        settings.validate()?;
        let http = HttpClient::with_auth(settings.http_config(default_base_url), auth)?;
        Ok(Self {
            http,
            settings: settings.clone(),
            observer: None,
        })
    }

    /// Send engine events to `observer` instead of `tracing`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Settings the client was built with
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Engine for one operation, labelled in its log events
    pub fn engine(&self, operation: &str) -> RetrievalEngine {
        let observer: Arc<dyn RetrievalObserver> = match &self.observer {
            Some(observer) => observer.clone(),
            None => Arc::new(TracingObserver::new(operation)),
        };
        RetrievalEngine::new(self.settings.backoff_policy()).with_observer(observer)
    }

    /// Run a traversal with a caller-supplied fetcher
    pub async fn retrieve(
        &self,
        operation: &str,
        fetcher: &dyn PageFetcher,
        initial: PageRequest,
        paginator: &dyn Paginator,
        extractor: &dyn RecordExtractor,
    ) -> Result<Retrieval> {
        self.engine(operation)
            .retrieve_all(fetcher, initial, paginator, extractor)
            .await
    }

    /// Run a GET traversal starting at `initial`
    pub async fn get_all(
        &self,
        operation: &str,
        initial: PageRequest,
        paginator: &dyn Paginator,
        extractor: &dyn RecordExtractor,
    ) -> Result<Retrieval> {
        let fetcher = EndpointFetcher::new(&self.http, initial.link_url().unwrap_or_default());
        self.retrieve(operation, &fetcher, initial, paginator, extractor)
            .await
    }

    /// One request whose whole body is the result.
    ///
    /// Goes through the engine, so 429s are retried like any page. Running
    /// out of retries is an error here since there is no partial result.
    pub async fn call(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        query: QueryParams,
        body: Option<Value>,
    ) -> Result<Value> {
        let mut fetcher = EndpointFetcher::new(&self.http, path).method(method);
        if let Some(body) = body {
            fetcher = fetcher.json(body);
        }

        let retrieval = self
            .retrieve(
                operation,
                &fetcher,
                PageRequest::with_params(path, query),
                &NoPaginator,
                &WholeBody,
            )
            .await?;

        if retrieval.reason == TerminationReason::RateLimitExhausted {
            return Err(Error::http_status(
                429,
                format!("{operation}: rate limit retries exhausted"),
            ));
        }
        Ok(retrieval
            .into_records()
            .into_iter()
            .next()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// GET one resource
    pub async fn get(&self, operation: &str, path: &str, query: QueryParams) -> Result<Value> {
        self.call(operation, Method::GET, path, query, None).await
    }

    /// POST a JSON body to one resource
    pub async fn post(&self, operation: &str, path: &str, body: Value) -> Result<Value> {
        self.call(operation, Method::POST, path, QueryParams::new(), Some(body))
            .await
    }
}

impl std::fmt::Debug for ApiCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCore")
            .field("http", &self.http)
            .field("has_observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

/// Reject empty identifiers before building a path from them
pub(crate) fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{name} cannot be empty")));
    }
    Ok(())
}
