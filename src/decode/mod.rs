//! Record extraction module
//!
//! Each vendor wraps its page records differently: under a top-level key
//! (`value`, `users`, `items`, `usageReports`, `employees`) or as a bare
//! array. An extractor pulls that list out of a decoded response body.

mod decoders;
mod types;

pub use decoders::JsonRecords;
pub use types::RecordExtractor;

#[cfg(test)]
mod tests;
