//! Authentication module
//!
//! Supports: Bearer, API Key (Okta `SSWS`, HiBob `Basic`), Basic, Custom Headers

mod types;

pub use types::{AuthConfig, Location};
