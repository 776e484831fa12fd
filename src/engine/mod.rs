//! Paginated retrieval engine
//!
//! One traversal loop shared by every vendor client.
//!
//! # Overview
//!
//! The engine module provides:
//! - `RetrievalEngine` - Walks pages until the paginator says stop
//! - `BackoffPolicy` - Bounded exponential backoff for HTTP 429
//! - `RetrievalObserver` - Structured event sink (`TracingObserver` by default)
//!
//! Vendors differ only in the three strategies passed to
//! [`RetrievalEngine::retrieve_all`]: the fetcher, the paginator and the
//! record extractor.

mod observer;
mod types;

pub use observer::{CollectingObserver, RetrievalObserver, TracingObserver};
pub use types::{
    BackoffPolicy, BackoffState, Retrieval, RetrievalEvent, TerminationReason,
    DEFAULT_RETRY_AFTER,
};

use crate::decode::RecordExtractor;
use crate::error::{Error, Result};
use crate::http::PageFetcher;
use crate::pagination::{NextPage, PageRequest, Paginator};
use std::sync::Arc;

/// Drives one traversal at a time; holds no per-traversal state
#[derive(Clone)]
pub struct RetrievalEngine {
    policy: BackoffPolicy,
    observer: Arc<dyn RetrievalObserver>,
}

impl Default for RetrievalEngine {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}

impl RetrievalEngine {
    /// Create an engine that logs through `tracing`
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            observer: Arc::new(TracingObserver::default()),
        }
    }

    /// Replace the event sink
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Backoff policy
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Fetch every page starting at `initial` and concatenate their records.
    ///
    /// Rate-limit exhaustion and a stalled paginator end the traversal with
    /// the records gathered so far. Any other non-2xx response is returned
    /// as `Error::HttpStatus` and the partial records are dropped.
    pub async fn retrieve_all(
        &self,
        fetcher: &dyn PageFetcher,
        initial: PageRequest,
        paginator: &dyn Paginator,
        extractor: &dyn RecordExtractor,
    ) -> Result<Retrieval> {
        let mut state = BackoffState::new();
        let mut records = Vec::new();
        let mut pages = 0;
        let mut retries = 0;
        let mut current = initial;

        let reason = loop {
            let response = fetcher.fetch(&current).await?;

            if response.is_rate_limited() {
                if state.exhausted(&self.policy) {
                    break TerminationReason::RateLimitExhausted;
                }
                let wait = self.policy.delay(state.attempts(), response.retry_after());
                state.record_retry();
                retries += 1;
                self.observer.on_event(&RetrievalEvent::RateLimited {
                    attempt: state.attempts(),
                    max_retries: self.policy.max_retries,
                    wait,
                });
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.is_success() {
                self.observer.on_event(&RetrievalEvent::HttpError {
                    status: response.status,
                    request: current.to_string(),
                });
                self.finish(TerminationReason::HttpError, pages, records.len());
                return Err(Error::http_status(response.status, response.raw));
            }

            state.reset();
            pages += 1;
            let page_records = extractor.extract(&response.body);
            self.observer.on_event(&RetrievalEvent::PageFetched {
                page: pages,
                records: page_records.len(),
            });
            records.extend(page_records);

            match paginator.next_page(&current, &response) {
                NextPage::Done => break TerminationReason::Completed,
                NextPage::Continue(next) if next == current => {
                    self.observer.on_event(&RetrievalEvent::Stalled {
                        request: next.to_string(),
                    });
                    break TerminationReason::Stalled;
                }
                NextPage::Continue(next) => current = next,
            }
        };

        self.finish(reason, pages, records.len());
        Ok(Retrieval {
            records,
            reason,
            pages,
            retries,
        })
    }

    fn finish(&self, reason: TerminationReason, pages: usize, records: usize) {
        self.observer.on_event(&RetrievalEvent::Finished {
            reason,
            pages,
            records,
        });
    }
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
