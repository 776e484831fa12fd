//! HTTP client module
//!
//! Provides the reqwest-backed client the vendor clients share.
//!
//! # Features
//!
//! - **Single-shot requests**: responses are buffered and returned for any status
//! - **Rate Limiting**: optional token bucket throttling using governor
//! - **Authentication**: static credentials applied to every request
//! - **Page fetchers**: adapters that let the retrieval engine drive an endpoint

mod client;
mod fetcher;
mod rate_limit;
mod response;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use fetcher::{EndpointFetcher, PageFetcher};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use response::PageResponse;
