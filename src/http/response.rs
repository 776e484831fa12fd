//! Buffered HTTP response handed to pagination strategies

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::Duration;

/// A fully read HTTP response.
///
/// The body is decoded as JSON for 2xx responses; an empty body decodes to
/// `Value::Null`. Error responses keep their raw text for diagnostics.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded JSON body (`Null` when empty or not JSON on an error status)
    pub body: Value,
    /// Raw body text
    pub raw: String,
}

impl PageResponse {
    /// Build from status, headers and body text
    pub fn from_parts(status: u16, headers: HeaderMap, raw: String) -> Result<Self> {
        let body = if raw.trim().is_empty() {
            Value::Null
        } else if (200..300).contains(&status) {
            serde_json::from_str(&raw)
                .map_err(|e| Error::decode(format!("Invalid JSON in {status} response: {e}")))?
        } else {
            serde_json::from_str(&raw).unwrap_or(Value::Null)
        };

        Ok(Self {
            status,
            headers,
            body,
            raw,
        })
    }

    /// Build a JSON response (mostly useful for scripted fetchers)
    pub fn json(status: u16, body: Value) -> Self {
        let raw = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        Self {
            status,
            headers: HeaderMap::new(),
            body,
            raw,
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.append(name, value);
        }
        self
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 Too Many Requests
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// First value of a header as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Server-suggested wait from `Retry-After`.
    ///
    /// Accepts delta-seconds or an HTTP date; dates in the past yield zero.
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.header("retry-after")?.trim();

        if let Ok(seconds) = value.parse::<u64>() {
            return Some(Duration::from_secs(seconds));
        }

        let date = DateTime::parse_from_rfc2822(value).ok()?;
        let delta = date.with_timezone(&Utc) - Utc::now();
        Some(Duration::from_secs(delta.num_seconds().max(0) as u64))
    }

    /// Convert a non-2xx response into an error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, self.raw))
        }
    }
}
