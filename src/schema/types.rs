//! Column schema types
//!
//! Mirrors the BigQuery `TableFieldSchema` JSON shape, so a schema fetched
//! from table metadata deserializes directly.

use serde::{Deserialize, Serialize};

/// Column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    String,
    Bytes,
    Integer,
    Int64,
    Float,
    Float64,
    Numeric,
    Bignumeric,
    Boolean,
    Bool,
    Timestamp,
    Date,
    Time,
    Datetime,
    Geography,
    Json,
    Record,
    Struct,
    /// Any type this crate does not know; projected as a scalar
    #[serde(other)]
    Unknown,
}

impl FieldType {
    /// RECORD or its STRUCT synonym
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record | Self::Struct)
    }
}

/// Column cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    /// Value or null
    #[default]
    Nullable,
    /// Always present, possibly as explicit null after projection
    Required,
    /// List of values
    Repeated,
}

/// One column of a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Column mode (NULLABLE when absent)
    #[serde(default)]
    pub mode: FieldMode,

    /// Nested columns, for RECORD types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,

    /// Column description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    /// NULLABLE scalar column
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            mode: FieldMode::Nullable,
            fields: None,
            description: None,
        }
    }

    /// NULLABLE RECORD column
    pub fn record(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            fields: Some(fields),
            ..Self::new(name, FieldType::Record)
        }
    }

    /// Set the mode
    #[must_use]
    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Mark REQUIRED
    #[must_use]
    pub fn required(self) -> Self {
        self.with_mode(FieldMode::Required)
    }

    /// Mark REPEATED
    #[must_use]
    pub fn repeated(self) -> Self {
        self.with_mode(FieldMode::Repeated)
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Nested columns when this is a record with a sub-schema
    pub fn subfields(&self) -> Option<&[FieldSpec]> {
        if self.field_type.is_record() {
            self.fields.as_deref()
        } else {
            None
        }
    }

    /// Whether values are projected recursively
    pub fn is_record(&self) -> bool {
        self.subfields().is_some()
    }
}

/// Table schema, as found under `schema` in table metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Top-level columns, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    /// Create a schema from its columns
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Look up a top-level column
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Project a value onto this schema
    pub fn project(&self, value: &serde_json::Value) -> serde_json::Value {
        super::project(value, &self.fields)
    }

    /// Number of top-level columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
