//! Okta management API
//!
//! Every list endpoint pages through RFC 5988 `Link` headers and returns a
//! bare JSON array.

use super::base::{require, ApiCore};
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::decode::JsonRecords;
use crate::engine::{Retrieval, RetrievalObserver};
use crate::error::Result;
use crate::pagination::{LinkHeaderPaginator, PageRequest};
use std::sync::Arc;

const LOGS_PAGE_SIZE: u32 = 1000;
const USERS_PAGE_SIZE: u32 = 200;

/// Filter selecting deprovisioned users
pub const DEPROVISIONED_FILTER: &str = r#"status eq "DEPROVISIONED""#;

/// Okta org client authenticated with an API token
#[derive(Debug)]
pub struct OktaClient {
    core: ApiCore,
}

impl OktaClient {
    /// Client for `https://{domain}.okta.com/api/v1`
    pub fn new(domain: &str, api_token: &str, settings: &ClientSettings) -> Result<Self> {
        require("domain", domain)?;
        let base_url = format!("https://{domain}.okta.com/api/v1");
        let core = ApiCore::new(settings, &base_url, AuthConfig::ssws(api_token))?;
        Ok(Self { core })
    }

    /// Send engine events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.core = self.core.with_observer(observer);
        self
    }

    /// System Log events, optionally bounded by ISO 8601 `since`/`until`.
    ///
    /// The log stream always links onward, so the first empty page ends it.
    pub async fn fetch_system_logs(
        &self,
        since: Option<&str>,
        until: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Retrieval> {
        let limit = limit.unwrap_or_else(|| self.core.settings().page_size_or(LOGS_PAGE_SIZE));
        let initial = PageRequest::url("logs")
            .param("limit", limit)
            .param_opt("since", since)
            .param_opt("until", until);

        self.core
            .get_all(
                "okta.fetch_system_logs",
                initial,
                &LinkHeaderPaginator::default().stop_on_empty(),
                &JsonRecords::bare_array(),
            )
            .await
    }

    /// Users, optionally narrowed by an Okta filter expression
    pub async fn fetch_users(&self, filter: Option<&str>) -> Result<Retrieval> {
        let initial = PageRequest::url("users")
            .param("limit", self.core.settings().page_size_or(USERS_PAGE_SIZE))
            .param_opt("filter", filter);

        self.core
            .get_all(
                "okta.fetch_users",
                initial,
                &LinkHeaderPaginator::default(),
                &JsonRecords::bare_array(),
            )
            .await
    }

    /// Users with status `DEPROVISIONED`
    pub async fn fetch_deactivated_users(&self) -> Result<Retrieval> {
        self.fetch_users(Some(DEPROVISIONED_FILTER)).await
    }

    /// Okta Workflows flows
    pub async fn fetch_all_workflows(&self) -> Result<Retrieval> {
        self.core
            .get_all(
                "okta.fetch_all_workflows",
                PageRequest::url("workflows"),
                &LinkHeaderPaginator::default(),
                &JsonRecords::bare_array(),
            )
            .await
    }

    /// Users assigned to an application
    pub async fn fetch_app_users(&self, app_id: &str, limit: Option<u32>) -> Result<Retrieval> {
        require("app_id", app_id)?;
        let limit = limit.unwrap_or_else(|| self.core.settings().page_size_or(USERS_PAGE_SIZE));
        let initial = PageRequest::url(format!("apps/{app_id}/users")).param("limit", limit);

        self.core
            .get_all(
                "okta.fetch_app_users",
                initial,
                &LinkHeaderPaginator::default(),
                &JsonRecords::bare_array(),
            )
            .await
    }
}
