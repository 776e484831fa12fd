//! Microsoft Graph (Entra ID)
//!
//! Lists page through `@odata.nextLink` and carry records under `value`.

use super::base::ApiCore;
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::decode::JsonRecords;
use crate::engine::{Retrieval, RetrievalObserver};
use crate::error::Result;
use crate::pagination::{NextUrlPaginator, PageRequest};
use std::sync::Arc;

/// Graph v1.0 endpoint
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

const SIGN_INS_PAGE_SIZE: u32 = 100;

/// Graph client using an app-only access token
#[derive(Debug)]
pub struct EntraClient {
    core: ApiCore,
}

impl EntraClient {
    /// Create a client from a bearer token for `https://graph.microsoft.com/.default`
    pub fn new(access_token: &str, settings: &ClientSettings) -> Result<Self> {
        let core = ApiCore::new(settings, GRAPH_BASE_URL, AuthConfig::bearer(access_token))?;
        Ok(Self { core })
    }

    /// Send engine events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.core = self.core.with_observer(observer);
        self
    }

    /// All directory users
    pub async fn fetch_all_users(&self) -> Result<Retrieval> {
        let initial = PageRequest::url("users").param_opt("$top", self.core.settings().page_size);

        self.core
            .get_all(
                "entra.fetch_all_users",
                initial,
                &NextUrlPaginator::odata(),
                &JsonRecords::key("value"),
            )
            .await
    }

    /// Sign-in logs, optionally bounded by ISO 8601 timestamps
    pub async fn fetch_audit_logs(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        top: Option<u32>,
    ) -> Result<Retrieval> {
        let top = top.unwrap_or_else(|| self.core.settings().page_size_or(SIGN_INS_PAGE_SIZE));
        let initial = PageRequest::url("auditLogs/signIns")
            .param("$top", top)
            .param_opt("$filter", created_date_filter(start, end));

        self.core
            .get_all(
                "entra.fetch_audit_logs",
                initial,
                &NextUrlPaginator::odata(),
                &JsonRecords::key("value"),
            )
            .await
    }
}

/// OData `$filter` on `createdDateTime`; `None` when unbounded
pub fn created_date_filter(start: Option<&str>, end: Option<&str>) -> Option<String> {
    let clauses: Vec<String> = [
        start.map(|s| format!("createdDateTime ge {s}")),
        end.map(|e| format!("createdDateTime le {e}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" and "))
    }
}
