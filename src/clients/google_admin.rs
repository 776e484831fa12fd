//! Google Workspace Admin SDK (Directory and Reports)
//!
//! Pages carry `nextPageToken`, sent back as `pageToken` alongside the
//! original query parameters.

use super::base::{require, ApiCore};
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::decode::JsonRecords;
use crate::engine::{Retrieval, RetrievalObserver};
use crate::error::Result;
use crate::pagination::{BodyTokenPaginator, PageRequest};
use std::sync::Arc;

/// Admin SDK endpoint
pub const ADMIN_BASE_URL: &str = "https://admin.googleapis.com";

/// Admin SDK client using a delegated access token
#[derive(Debug)]
pub struct GoogleAdminClient {
    core: ApiCore,
}

impl GoogleAdminClient {
    /// Create a client from an OAuth access token
    pub fn new(access_token: &str, settings: &ClientSettings) -> Result<Self> {
        let core = ApiCore::new(settings, ADMIN_BASE_URL, AuthConfig::bearer(access_token))?;
        Ok(Self { core })
    }

    /// Send engine events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.core = self.core.with_observer(observer);
        self
    }

    /// Directory users of `customer` (`my_customer` for the caller's account)
    pub async fn fetch_all_users(
        &self,
        customer: &str,
        projection: &str,
        show_deleted: bool,
    ) -> Result<Retrieval> {
        require("customer", customer)?;
        let initial = PageRequest::url("admin/directory/v1/users")
            .param("customer", customer)
            .param("projection", projection)
            .param_opt("showDeleted", show_deleted.then_some("true"))
            .param_opt("maxResults", self.core.settings().page_size);

        self.core
            .get_all(
                "google_admin.fetch_all_users",
                initial,
                &BodyTokenPaginator::default(),
                &JsonRecords::key("users"),
            )
            .await
    }

    /// Activity report events of one application (`login`, `admin`, `drive`, ...)
    /// for `user_key` (`all` for every user)
    pub async fn fetch_activities(&self, application: &str, user_key: &str) -> Result<Retrieval> {
        require("application", application)?;
        require("user_key", user_key)?;
        let initial = PageRequest::url(format!(
            "admin/reports/v1/activity/users/{user_key}/applications/{application}"
        ))
        .param_opt("maxResults", self.core.settings().page_size);

        self.core
            .get_all(
                "google_admin.fetch_activities",
                initial,
                &BodyTokenPaginator::default(),
                &JsonRecords::key("items"),
            )
            .await
    }

    /// Per-user usage reports for one day (`YYYY-MM-DD`)
    pub async fn fetch_user_usage(&self, date: &str) -> Result<Retrieval> {
        require("date", date)?;
        let initial = PageRequest::url(format!("admin/reports/v1/usage/users/all/dates/{date}"))
            .param_opt("maxResults", self.core.settings().page_size);

        self.core
            .get_all(
                "google_admin.fetch_user_usage",
                initial,
                &BodyTokenPaginator::default(),
                &JsonRecords::key("usageReports"),
            )
            .await
    }
}
