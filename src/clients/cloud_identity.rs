//! Google Cloud Identity user invitations

use super::base::{require, ApiCore};
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::error::Result;
use crate::types::QueryParams;
use serde_json::Value;

/// Cloud Identity v1beta1 endpoint
pub const CLOUD_IDENTITY_BASE_URL: &str = "https://cloudidentity.googleapis.com/v1beta1";

/// Cloud Identity client
#[derive(Debug)]
pub struct CloudIdentityClient {
    core: ApiCore,
}

impl CloudIdentityClient {
    /// Create a client from an OAuth access token
    pub fn new(access_token: &str, settings: &ClientSettings) -> Result<Self> {
        let core = ApiCore::new(settings, CLOUD_IDENTITY_BASE_URL, AuthConfig::bearer(access_token))?;
        Ok(Self { core })
    }

    /// Whether an unmanaged account can be invited.
    ///
    /// `customer` is the resource name, e.g. `customers/C01234abc`. Returns
    /// the raw response (`{"isInvitableUser": true}`), or `{}` when empty.
    pub async fn is_invitable_user(&self, customer: &str, email: &str) -> Result<Value> {
        require("customer", customer)?;
        require("email", email)?;

        let mut query = QueryParams::new();
        query.insert("userEmail".to_string(), email.to_string());
        self.core
            .get(
                "cloud_identity.is_invitable_user",
                &format!("{customer}/userinvitations:isInvitableUser"),
                query,
            )
            .await
    }
}
