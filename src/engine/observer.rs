//! Retrieval event sinks

use super::types::{RetrievalEvent, TerminationReason};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Receives engine events as they happen
pub trait RetrievalObserver: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &RetrievalEvent);
}

/// Forwards events to `tracing`, labelled with the operation name
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    /// Observer for one operation (e.g. `okta.fetch_users`)
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    /// Operation label
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retrieval")
    }
}

impl RetrievalObserver for TracingObserver {
    fn on_event(&self, event: &RetrievalEvent) {
        let op = &self.operation;
        match event {
            RetrievalEvent::PageFetched { page, records } => {
                debug!("{op}: page {page} fetched {records} records");
            }
            RetrievalEvent::RateLimited {
                attempt,
                max_retries,
                wait,
            } => {
                warn!("{op}: rate limited (429), retry {attempt}/{max_retries} in {wait:?}");
            }
            RetrievalEvent::HttpError { status, request } => {
                warn!("{op}: request {request} failed with HTTP {status}");
            }
            RetrievalEvent::Stalled { request } => {
                warn!("{op}: pagination stalled, next page repeats {request}");
            }
            RetrievalEvent::Finished {
                reason: TerminationReason::Completed,
                pages,
                records,
            } => {
                info!("{op}: completed with {records} records in {pages} pages");
            }
            RetrievalEvent::Finished {
                reason,
                pages,
                records,
            } => {
                warn!("{op}: stopped early ({reason}) with {records} records in {pages} pages");
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<RetrievalEvent>>,
}

impl CollectingObserver {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<RetrievalEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reasons of every `Finished` event
    pub fn reasons(&self) -> Vec<TerminationReason> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RetrievalEvent::Finished { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }
}

impl RetrievalObserver for CollectingObserver {
    fn on_event(&self, event: &RetrievalEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
