//! Record extractor implementations

use super::types::RecordExtractor;
use crate::pagination::lookup;
use serde_json::Value;

/// JSON record extractor with optional record path.
///
/// Without a path the whole body is the record list (Okta returns bare
/// arrays). With a path, the value found there is the record list.
#[derive(Debug, Clone, Default)]
pub struct JsonRecords {
    record_path: Option<String>,
}

impl JsonRecords {
    /// Records under a top-level key or dot path (`value`, `employees`, ...)
    pub fn key(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Records are the top-level array itself
    pub fn bare_array() -> Self {
        Self::default()
    }

    /// Configured record path
    pub fn record_path(&self) -> Option<&str> {
        self.record_path.as_deref()
    }
}

impl RecordExtractor for JsonRecords {
    fn extract(&self, body: &Value) -> Vec<Value> {
        let records = match &self.record_path {
            Some(path) => lookup(body, path),
            None => Some(body),
        };

        match records {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(single) => vec![single.clone()],
        }
    }
}
