//! Dataform compilation results and workflow invocations

use super::base::{require, ApiCore};
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::engine::RetrievalObserver;
use crate::error::{Error, Result};
use crate::types::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Dataform v1beta1 endpoint
pub const DATAFORM_BASE_URL: &str = "https://dataform.googleapis.com/v1beta1";

/// Workflow invocation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowState {
    StateUnspecified,
    Running,
    Succeeded,
    Cancelling,
    Cancelled,
    Failed,
    /// State missing from the response or not known to this crate
    #[serde(other)]
    Unknown,
}

impl WorkflowState {
    /// The invocation will not change state again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    fn from_invocation(body: &Value) -> Self {
        body.get("state")
            .cloned()
            .and_then(|state| serde_json::from_value(state).ok())
            .unwrap_or(Self::Unknown)
    }
}

/// Dataform client scoped to one project and location
#[derive(Debug)]
pub struct DataformClient {
    core: ApiCore,
    project_id: String,
    location: String,
}

impl DataformClient {
    /// Create a client from an OAuth access token
    pub fn new(
        project_id: &str,
        location: &str,
        access_token: &str,
        settings: &ClientSettings,
    ) -> Result<Self> {
        require("project_id", project_id)?;
        require("location", location)?;
        let core = ApiCore::new(settings, DATAFORM_BASE_URL, AuthConfig::bearer(access_token))?;
        Ok(Self {
            core,
            project_id: project_id.to_string(),
            location: location.to_string(),
        })
    }

    /// Send engine events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.core = self.core.with_observer(observer);
        self
    }

    /// Resource name of a repository
    pub fn repository_name(&self, repository_id: &str) -> String {
        format!(
            "projects/{}/locations/{}/repositories/{repository_id}",
            self.project_id, self.location
        )
    }

    /// Resource name of a compilation result
    pub fn compilation_result_name(&self, repository_id: &str, compilation_result_id: &str) -> String {
        format!(
            "{}/compilationResults/{compilation_result_id}",
            self.repository_name(repository_id)
        )
    }

    /// Fetch a compilation result
    pub async fn get_compilation_result(
        &self,
        repository_id: &str,
        compilation_result_id: &str,
    ) -> Result<Value> {
        require("repository_id", repository_id)?;
        require("compilation_result_id", compilation_result_id)?;
        self.core
            .get(
                "dataform.get_compilation_result",
                &self.compilation_result_name(repository_id, compilation_result_id),
                QueryParams::new(),
            )
            .await
    }

    /// Start a workflow invocation of a compilation result.
    ///
    /// Returns the created invocation; its `name` feeds
    /// [`check_workflow_status`](Self::check_workflow_status).
    pub async fn start_workflow(
        &self,
        repository_id: &str,
        compilation_result_id: &str,
    ) -> Result<Value> {
        require("repository_id", repository_id)?;
        require("compilation_result_id", compilation_result_id)?;
        let body = json!({
            "compilationResult": self.compilation_result_name(repository_id, compilation_result_id),
        });

        let invocation = self
            .core
            .post(
                "dataform.start_workflow",
                &format!("{}/workflowInvocations", self.repository_name(repository_id)),
                body,
            )
            .await?;
        let name = invocation
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        info!("Started Dataform workflow {name}");
        Ok(invocation)
    }

    /// Current state of a workflow invocation, by full resource name
    pub async fn check_workflow_status(&self, invocation_name: &str) -> Result<WorkflowState> {
        require("invocation_name", invocation_name)?;
        let invocation = self
            .core
            .get(
                "dataform.check_workflow_status",
                invocation_name,
                QueryParams::new(),
            )
            .await?;
        Ok(WorkflowState::from_invocation(&invocation))
    }

    /// Poll until the invocation reaches a terminal state.
    ///
    /// Returns that state, including `Failed` and `Cancelled`. Fails with
    /// `Error::Workflow` if it is still running after `max_polls` checks.
    pub async fn wait_for_workflow(
        &self,
        invocation_name: &str,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Result<WorkflowState> {
        let mut state = WorkflowState::Unknown;
        for poll in 1..=max_polls {
            state = self.check_workflow_status(invocation_name).await?;
            debug!("Workflow {invocation_name} is {state:?} (poll {poll}/{max_polls})");
            if state.is_terminal() {
                info!("Workflow {invocation_name} finished as {state:?}");
                return Ok(state);
            }
            if poll < max_polls {
                tokio::time::sleep(poll_interval).await;
            }
        }

        Err(Error::workflow(
            invocation_name,
            format!("still {state:?} after {max_polls} polls"),
        ))
    }
}
