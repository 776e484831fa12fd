//! Auth configuration types
//!
//! Credentials are supplied ready to use. Minting them (OAuth flows, MSAL,
//! service-account impersonation) happens outside this crate.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// Authentication configuration
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// `Authorization: Bearer <token>`
    Bearer {
        /// The bearer token
        token: String,
    },

    /// API key in a header or query parameter
    ApiKey {
        /// Where to place the API key
        location: Location,
        /// Header or query parameter name
        name: String,
        /// Prefix to add before the value (e.g., "SSWS ")
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Custom headers
    CustomHeaders {
        /// Headers to add to each request
        headers: HashMap<String, String>,
    },
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Okta API token: `Authorization: SSWS <token>`
    pub fn ssws(token: impl Into<String>) -> Self {
        Self::authorization("SSWS ", token)
    }

    /// Pre-encoded Basic credential: `Authorization: Basic <encoded>`
    pub fn basic_encoded(encoded: impl Into<String>) -> Self {
        Self::authorization("Basic ", encoded)
    }

    /// Basic auth from a username and password
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    fn authorization(prefix: &str, value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Header,
            name: AUTHORIZATION.as_str().to_string(),
            prefix: Some(prefix.to_string()),
            value: value.into(),
        }
    }

    /// Short name of the auth kind, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bearer { .. } => "bearer",
            Self::ApiKey { .. } => "api_key",
            Self::Basic { .. } => "basic",
            Self::CustomHeaders { .. } => "custom_headers",
        }
    }

    /// Reject empty secrets before any request is made
    pub fn validate(&self) -> Result<()> {
        let empty = match self {
            Self::None | Self::CustomHeaders { .. } => false,
            Self::Bearer { token } => token.trim().is_empty(),
            Self::ApiKey { name, value, .. } => name.is_empty() || value.trim().is_empty(),
            Self::Basic { username, .. } => username.is_empty(),
        };
        if empty {
            return Err(Error::auth(format!("{} credential cannot be empty", self.kind())));
        }
        Ok(())
    }

    /// Encode `username:password` for a Basic header
    pub fn basic_credentials(username: &str, password: &str) -> String {
        STANDARD.encode(format!("{username}:{password}"))
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => req,

            Self::Bearer { token } => req.bearer_auth(token),

            Self::ApiKey {
                location,
                name,
                prefix,
                value,
            } => {
                let val = format!("{}{}", prefix.as_deref().unwrap_or(""), value);
                match location {
                    Location::Header => req.header(name.as_str(), val),
                    Location::Query => req.query(&[(name.as_str(), val.as_str())]),
                }
            }

            Self::Basic { username, password } => req.header(
                AUTHORIZATION,
                format!("Basic {}", Self::basic_credentials(username, password)),
            ),

            Self::CustomHeaders { headers } => {
                let mut req = req;
                for (key, value) in headers {
                    req = req.header(key.as_str(), value.as_str());
                }
                req
            }
        }
    }
}

// Secrets stay out of logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
