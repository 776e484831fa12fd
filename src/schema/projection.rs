//! Schema-driven reshaping of arbitrary JSON
//!
//! Unknown keys are dropped and values of the wrong shape are nulled, so one
//! malformed upstream record never fails a whole insert batch.

use super::types::{FieldMode, FieldSpec};
use serde_json::{Map, Value};

/// Project `value` onto `schema`.
///
/// Total: any input produces a mapping whose keys are schema field names.
/// REQUIRED fields that end up null are kept as explicit `null`; other null
/// fields are omitted. A non-mapping input yields a bare `{}`.
///
/// For mapping inputs, projecting the output again returns it unchanged.
pub fn project(value: &Value, schema: &[FieldSpec]) -> Value {
    let Value::Object(input) = value else {
        return Value::Object(Map::new());
    };

    let mut out = Map::with_capacity(schema.len());
    for field in schema {
        let raw = input.get(&field.name).unwrap_or(&Value::Null);
        if let Some(projected) = project_field(raw, field) {
            out.insert(field.name.clone(), projected);
        }
    }
    Value::Object(out)
}

/// `None` means the field is left out of the output mapping
fn project_field(raw: &Value, field: &FieldSpec) -> Option<Value> {
    let projected = match (raw, field.subfields()) {
        (Value::Null, _) => Value::Null,
        (_, Some(sub)) if field.mode == FieldMode::Repeated => {
            Value::Array(match raw {
                Value::Array(items) => items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(|item| project(item, sub))
                    .collect(),
                _ => Vec::new(),
            })
        }
        (Value::Object(_), Some(sub)) => project(raw, sub),
        (_, Some(_)) => Value::Null,
        (_, None) if field.mode == FieldMode::Repeated => {
            Value::Array(match raw {
                Value::Array(items) => items.iter().filter(|v| is_scalar(v)).cloned().collect(),
                _ => Vec::new(),
            })
        }
        (scalar, None) if is_scalar(scalar) => scalar.clone(),
        _ => Value::Null,
    };

    if projected.is_null() && field.mode != FieldMode::Required {
        None
    } else {
        Some(projected)
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
