// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # platform-clients
//!
//! Rate-limit aware clients for identity and data-platform APIs: Okta,
//! Microsoft Graph, Google Admin SDK, Google Cloud Identity, HiBob, Dataform
//! and BigQuery.
//!
//! ## Features
//!
//! - **One pagination loop**: every vendor list call runs through `RetrievalEngine`
//! - **429 backoff**: `max(Retry-After, min(base * 2^n, max))`, bounded retries
//! - **Schema projection**: reshape arbitrary JSON to fit a BigQuery schema
//! - **Chunked inserts**: `insertAll` in fixed-size chunks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use platform_clients::{clients::OktaClient, ClientSettings, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let okta = OktaClient::new("acme", "00token", &ClientSettings::default())?;
//!     let users = okta.fetch_deactivated_users().await?;
//!     println!("{} users ({})", users.len(), users.reason);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Okta │ Entra │ Google Admin │ HiBob │ Dataform │ BigQuery   │
//! └───────────────────────────┬──────────────────────────────────┘
//!                             │ fetcher + paginator + extractor
//! ┌───────────────────────────┴──────────────────────────────────┐
//! │              RetrievalEngine (429 backoff, stall guard)      │
//! └──────────┬──────────────────┬───────────────────┬────────────┘
//!            │                  │                   │
//!       HttpClient          Paginator        RecordExtractor
//!   (auth, rate limit)  (link / token / odata)  (key / array)
//!
//!   schema::project ──► output::insert_in_chunks ──► RowSink
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Static credentials
pub mod auth;

/// HTTP client, page fetchers and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Record extraction from response bodies
pub mod decode;

/// Paginated retrieval engine
pub mod engine;

/// Column schemas and JSON projection
pub mod schema;

/// Chunked row insertion
pub mod output;

/// Client settings
pub mod config;

/// Default `tracing` subscriber
pub mod logging;

/// Vendor clients
pub mod clients;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ClientSettings, RetrySettings};
pub use engine::{BackoffPolicy, Retrieval, RetrievalEngine, TerminationReason};
pub use error::{Error, Result};
pub use schema::{project, FieldMode, FieldSpec, FieldType, TableSchema};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
