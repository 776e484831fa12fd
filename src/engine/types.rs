//! Engine types
//!
//! Backoff policy, traversal results and the events emitted while paging.

use serde_json::Value;
use std::time::Duration;

/// Default server-suggested wait when a 429 carries no `Retry-After`
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Bounded exponential backoff for rate-limited pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Retries allowed for one page before giving up
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_backoff: Duration,
    /// Upper bound for the exponential part of the delay
    pub max_backoff: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl BackoffPolicy {
    /// Create a new policy with default delays
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Set max retries
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set base and max backoff
    #[must_use]
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.base_backoff = base;
        self.max_backoff = max;
        self
    }

    /// Delay before retry number `attempts + 1`.
    ///
    /// The larger of the server's suggestion and `min(base * 2^attempts, max)`.
    pub fn delay(&self, attempts: u32, retry_after: Option<Duration>) -> Duration {
        let exponential = 2u32
            .checked_pow(attempts)
            .and_then(|factor| self.base_backoff.checked_mul(factor))
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff));

        retry_after.unwrap_or(DEFAULT_RETRY_AFTER).max(exponential)
    }
}

/// Per-traversal retry counter, reset by every successful page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackoffState {
    attempts: u32,
}

impl BackoffState {
    /// Fresh state for a new traversal
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries used on the current page
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether the policy allows no more retries
    pub fn exhausted(&self, policy: &BackoffPolicy) -> bool {
        self.attempts >= policy.max_retries
    }

    /// Count one retry
    pub fn record_retry(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// A page succeeded
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

/// Why a traversal stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The next-page extractor reported no further page
    Completed,
    /// A page stayed rate limited after every allowed retry
    RateLimitExhausted,
    /// The next descriptor equalled the current one
    Stalled,
    /// A non-2xx, non-429 response aborted the traversal
    HttpError,
}

impl TerminationReason {
    /// Stable tag for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::RateLimitExhausted => "rate_limited_exhausted",
            Self::Stalled => "stalled",
            Self::HttpError => "http_error",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records gathered by one traversal, in page-arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    /// All records, page order then within-page order
    pub records: Vec<Value>,
    /// Why the traversal stopped
    pub reason: TerminationReason,
    /// Successful pages fetched
    pub pages: usize,
    /// Rate-limit retries performed
    pub retries: u32,
}

impl Retrieval {
    /// Whether every page was fetched
    pub fn is_complete(&self) -> bool {
        self.reason == TerminationReason::Completed
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records were gathered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records
    pub fn into_records(self) -> Vec<Value> {
        self.records
    }
}

/// Structured event emitted while a traversal runs
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalEvent {
    /// A page was fetched successfully
    PageFetched {
        /// 1-based page number
        page: usize,
        /// Records extracted from this page
        records: usize,
    },
    /// A 429 was received and the page will be retried
    RateLimited {
        /// Retry number about to be made (1-based)
        attempt: u32,
        /// Retries allowed
        max_retries: u32,
        /// Time slept before the retry
        wait: Duration,
    },
    /// A non-2xx response aborted the traversal
    HttpError {
        /// Response status
        status: u16,
        /// Request that failed
        request: String,
    },
    /// The next descriptor repeated the current one
    Stalled {
        /// Repeated request
        request: String,
    },
    /// The traversal ended
    Finished {
        /// Termination reason
        reason: TerminationReason,
        /// Successful pages
        pages: usize,
        /// Total records
        records: usize,
    },
}
