//! Column schemas and projection
//!
//! # Features
//!
//! - **BigQuery field model**: `FieldSpec` with type, mode and nested fields
//! - **Projection**: reshapes arbitrary JSON so it fits a schema
//! - **Nested/Repeated Support**: RECORD and REPEATED fields recurse

mod projection;
mod types;

pub use projection::project;
pub use types::{FieldMode, FieldSpec, FieldType, TableSchema};

#[cfg(test)]
mod tests;
