//! Chunked row insertion

use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

/// Column added to every row when load timestamps are enabled
pub const RECORD_LOAD_TIME: &str = "record_load_time";

/// Destination accepting one chunk of JSON rows at a time
#[async_trait]
pub trait RowSink: Send + Sync {
    /// Insert one chunk; returns the per-row errors reported by the
    /// destination (empty on success)
    async fn insert_chunk(&self, rows: &[Value]) -> Result<Vec<Value>>;

    /// Destination name for logs
    fn name(&self) -> &str;
}

/// Options for batched insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertOptions {
    /// Rows per request
    pub chunk_size: usize,
    /// Stamp each row with `record_load_time`
    pub add_record_load_time: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            add_record_load_time: true,
        }
    }
}

impl InsertOptions {
    /// Set rows per chunk
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Enable or disable load timestamps
    #[must_use]
    pub fn with_record_load_time(mut self, enabled: bool) -> Self {
        self.add_record_load_time = enabled;
        self
    }
}

/// Outcome of a successful batched insertion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    /// Rows inserted
    pub rows: usize,
    /// Chunks sent
    pub chunks: usize,
}

/// Stamp every mapping row with the same UTC load time
pub fn add_record_load_time(rows: &mut [Value]) {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    for row in rows.iter_mut() {
        if let Value::Object(map) = row {
            map.insert(RECORD_LOAD_TIME.to_string(), Value::String(now.clone()));
        }
    }
}

/// Insert rows in sequential fixed-size chunks.
///
/// The first chunk reporting errors aborts with `Error::InsertRows`; chunks
/// already sent stay inserted.
pub async fn insert_in_chunks(
    sink: &dyn RowSink,
    mut rows: Vec<Value>,
    options: InsertOptions,
) -> Result<InsertSummary> {
    if options.chunk_size == 0 {
        return Err(Error::invalid_argument("chunk_size must be greater than 0"));
    }
    if options.add_record_load_time {
        add_record_load_time(&mut rows);
    }

    let mut summary = InsertSummary::default();
    for (index, chunk) in rows.chunks(options.chunk_size).enumerate() {
        let number = index + 1;
        let errors = sink.insert_chunk(chunk).await?;
        if !errors.is_empty() {
            error!(
                "Errors inserting into {} (chunk {number}): {} rows rejected",
                sink.name(),
                errors.len()
            );
            return Err(Error::insert_rows(number, Value::Array(errors)));
        }
        info!(
            "Inserted {} rows into {} (chunk {number})",
            chunk.len(),
            sink.name()
        );
        summary.rows += chunk.len();
        summary.chunks = number;
    }

    Ok(summary)
}
