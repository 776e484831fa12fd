//! Schema projection tests

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn user_schema() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("id", FieldType::String).required(),
        FieldSpec::new("email", FieldType::String),
        FieldSpec::new("age", FieldType::Integer),
        FieldSpec::new("active", FieldType::Boolean),
        FieldSpec::new("tags", FieldType::String).repeated(),
        FieldSpec::record(
            "manager",
            vec![
                FieldSpec::new("id", FieldType::String).required(),
                FieldSpec::new("name", FieldType::String),
            ],
        ),
        FieldSpec::record(
            "emails",
            vec![
                FieldSpec::new("address", FieldType::String).required(),
                FieldSpec::new("primary", FieldType::Bool),
            ],
        )
        .repeated(),
    ]
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_field_spec_deserialize_bigquery_shape() {
    let schema: TableSchema = serde_json::from_value(json!({
        "fields": [
            {"name": "id", "type": "STRING", "mode": "REQUIRED"},
            {"name": "score", "type": "FLOAT64"},
            {"name": "addr", "type": "STRUCT", "mode": "REPEATED", "fields": [
                {"name": "city", "type": "STRING"}
            ]},
            {"name": "span", "type": "RANGE"}
        ]
    }))
    .unwrap();

    assert_eq!(schema.len(), 4);
    assert_eq!(schema.fields[0].mode, FieldMode::Required);
    assert_eq!(schema.fields[1].mode, FieldMode::Nullable);
    assert!(schema.field("addr").unwrap().is_record());
    assert_eq!(schema.field("span").unwrap().field_type, FieldType::Unknown);
}

#[test]
fn test_field_spec_serialize_skips_empty() {
    let value = serde_json::to_value(FieldSpec::new("n", FieldType::Int64)).unwrap();
    assert_eq!(value, json!({"name": "n", "type": "INT64", "mode": "NULLABLE"}));
}

#[test]
fn test_record_without_fields_is_not_recursive() {
    let field = FieldSpec::new("blob", FieldType::Record);
    assert!(!field.is_record());
    assert!(FieldSpec::record("r", vec![]).is_record());
    assert!(!FieldSpec {
        fields: Some(vec![]),
        ..FieldSpec::new("s", FieldType::String)
    }
    .is_record());
}

// ============================================================================
// Projection Tests
// ============================================================================

#[test]
fn test_project_well_formed_record() {
    let input = json!({
        "id": "u1",
        "email": "a@example.com",
        "age": 41,
        "active": true,
        "tags": ["admin", "ops"],
        "manager": {"id": "u0", "name": "Root", "extra": 1},
        "emails": [{"address": "a@example.com", "primary": true}],
        "unknown": "dropped"
    });

    let projected = project(&input, &user_schema());

    assert_eq!(
        projected,
        json!({
            "id": "u1",
            "email": "a@example.com",
            "age": 41,
            "active": true,
            "tags": ["admin", "ops"],
            "manager": {"id": "u0", "name": "Root"},
            "emails": [{"address": "a@example.com", "primary": true}]
        })
    );
}

#[test]
fn test_required_fields_surface_as_null() {
    let projected = project(&json!({"email": "x"}), &user_schema());
    assert_eq!(projected, json!({"id": null, "email": "x"}));
}

#[test]
fn test_nested_required_field_surfaces_as_null() {
    let projected = project(&json!({"id": "u", "manager": {"name": "M"}}), &user_schema());
    assert_eq!(projected["manager"], json!({"id": null, "name": "M"}));
}

#[test]
fn test_repeated_record_given_single_mapping() {
    let projected = project(
        &json!({"id": "u", "emails": {"address": "a@example.com"}}),
        &user_schema(),
    );
    assert_eq!(projected["emails"], json!([]));
}

#[test]
fn test_repeated_record_skips_non_mapping_items() {
    let projected = project(
        &json!({"id": "u", "emails": [{"address": "a"}, "b", null, {"address": "c", "x": 1}]}),
        &user_schema(),
    );
    assert_eq!(
        projected["emails"],
        json!([{"address": "a"}, {"address": "c"}])
    );
}

#[test]
fn test_repeated_scalar_keeps_only_scalars() {
    let projected = project(
        &json!({"id": "u", "tags": ["a", 1, true, null, {"k": "v"}, ["n"]]}),
        &user_schema(),
    );
    assert_eq!(projected["tags"], json!(["a", 1, true]));

    let projected = project(&json!({"id": "u", "tags": "single"}), &user_schema());
    assert_eq!(projected["tags"], json!([]));
}

#[test]
fn test_wrong_shapes_are_coerced() {
    let projected = project(
        &json!({
            "id": {"nested": "object"},
            "email": ["list"],
            "manager": "not a mapping",
            "age": 3.5
        }),
        &user_schema(),
    );
    // REQUIRED id keeps an explicit null, NULLABLE columns are omitted
    assert_eq!(projected, json!({"id": null, "age": 3.5}));
}

#[test]
fn test_null_repeated_is_omitted() {
    let projected = project(&json!({"id": "u", "tags": null, "emails": null}), &user_schema());
    assert_eq!(projected, json!({"id": "u"}));
}

#[test]
fn test_output_keys_follow_schema_order() {
    let projected = project(&json!({"active": false, "id": "u", "email": "e"}), &user_schema());
    let keys: Vec<&String> = projected.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["id", "email", "active"]);
}

#[test]
fn test_table_schema_project() {
    let schema = TableSchema::new(vec![FieldSpec::new("a", FieldType::String)]);
    assert_eq!(schema.project(&json!({"a": "x", "b": "y"})), json!({"a": "x"}));
}

#[test_case(json!(null) ; "null")]
#[test_case(json!(42) ; "number")]
#[test_case(json!("text") ; "string")]
#[test_case(json!([1, 2, 3]) ; "array")]
#[test_case(json!(true) ; "bool")]
fn test_non_mapping_projects_to_empty(value: Value) {
    assert_eq!(project(&value, &user_schema()), json!({}));
}

#[test]
fn test_non_mapping_output_fills_required_on_reprojection() {
    let once = project(&json!("not a mapping"), &user_schema());
    assert_eq!(once, json!({}));
    assert_eq!(project(&once, &user_schema()), json!({"id": null}));
}

#[test]
fn test_empty_schema() {
    assert_eq!(project(&json!({"a": 1}), &[]), json!({}));
}

#[test_case(json!({}) ; "empty mapping")]
#[test_case(json!({"id": "u1", "tags": ["a", 2], "manager": {"id": "m"}}) ; "well formed")]
#[test_case(json!({"id": 7, "tags": "x", "emails": {"address": "single"}}) ; "repeated given scalars")]
#[test_case(json!({"id": null, "manager": [], "emails": [null, {"primary": "yes"}]}) ; "nulls and junk")]
#[test_case(json!({"email": {"a": 1}, "age": [1], "active": "true", "manager": {"name": {"x": 1}}}) ; "coerced nulls")]
fn test_projection_is_idempotent(input: Value) {
    let schema = user_schema();
    let once = project(&input, &schema);
    let twice = project(&once, &schema);
    assert_eq!(once, twice);
}

#[test]
fn test_projection_is_total_on_deep_junk() {
    let schema = vec![FieldSpec::record(
        "a",
        vec![FieldSpec::record(
            "b",
            vec![FieldSpec::new("c", FieldType::String).required()],
        )
        .repeated()],
    )
    .required()];

    let projected = project(&json!({"a": {"b": [{"c": [[[]]]}, 1, {"c": "ok"}]}}), &schema);
    assert_eq!(
        projected,
        json!({"a": {"b": [{"c": null}, {"c": "ok"}]}})
    );

    let projected = project(&json!({"a": 5}), &schema);
    assert_eq!(projected, json!({"a": null}));
}
