//! Record extraction trait
//!
//! Turns one decoded response body into the ordered records it carries.

use serde_json::Value;

/// Extracts the records of one page from its decoded body.
///
/// Extraction never fails: a body without the expected shape yields no
/// records rather than aborting the traversal.
pub trait RecordExtractor: Send + Sync {
    /// Records of this page, in response order
    fn extract(&self, body: &Value) -> Vec<Value>;
}

impl<F> RecordExtractor for F
where
    F: Fn(&Value) -> Vec<Value> + Send + Sync,
{
    fn extract(&self, body: &Value) -> Vec<Value> {
        self(body)
    }
}
