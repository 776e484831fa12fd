//! HiBob people API

use super::base::ApiCore;
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::decode::JsonRecords;
use crate::engine::{Retrieval, RetrievalObserver};
use crate::error::Result;
use crate::http::EndpointFetcher;
use crate::pagination::NoPaginator;
use crate::types::Method;
use serde_json::{json, Value};
use std::sync::Arc;

/// HiBob v1 endpoint
pub const HIBOB_BASE_URL: &str = "https://api.hibob.com/v1";

/// Fields requested from `people/search`
pub const EMPLOYEE_FIELDS: &[&str] = &[
    "root.id",
    "root.email",
    "root.fullName",
    "root.displayName",
    "root.creationDateTime",
    "root.companyId",
    "work.siteId",
    "work",
];

/// HiBob client
#[derive(Debug)]
pub struct HiBobClient {
    core: ApiCore,
}

impl HiBobClient {
    /// Create a client from a pre-encoded Basic credential
    pub fn new(api_key: &str, settings: &ClientSettings) -> Result<Self> {
        Self::with_auth(AuthConfig::basic_encoded(api_key), settings)
    }

    /// Create a client for a service user
    pub fn service_user(id: &str, token: &str, settings: &ClientSettings) -> Result<Self> {
        Self::with_auth(AuthConfig::basic(id, token), settings)
    }

    fn with_auth(auth: AuthConfig, settings: &ClientSettings) -> Result<Self> {
        let core = ApiCore::new(settings, HIBOB_BASE_URL, auth)?;
        Ok(Self { core })
    }

    /// Send engine events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.core = self.core.with_observer(observer);
        self
    }

    /// Every employee, with human-readable values
    pub async fn fetch_all_employees(&self, show_inactive: bool) -> Result<Retrieval> {
        let fetcher = EndpointFetcher::new(self.core.http(), "people/search")
            .method(Method::POST)
            .json(search_body(show_inactive));
        let initial = fetcher.first_page();

        self.core
            .retrieve(
                "hibob.fetch_all_employees",
                &fetcher,
                initial,
                &NoPaginator,
                &JsonRecords::key("employees"),
            )
            .await
    }
}

fn search_body(show_inactive: bool) -> Value {
    json!({
        "showInactive": show_inactive,
        "humanReadable": "REPLACE",
        "fields": EMPLOYEE_FIELDS,
    })
}
