//! Tests for record extraction

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

#[test_case("value", json!({"value": [{"id": 1}, {"id": 2}], "@odata.nextLink": "x"}) ; "graph value")]
#[test_case("employees", json!({"employees": [{"id": 1}, {"id": 2}]}) ; "hibob employees")]
#[test_case("usageReports", json!({"kind": "admin#reports", "usageReports": [{"id": 1}, {"id": 2}]}) ; "usage reports")]
fn test_key_extracts_in_order(key: &str, body: Value) {
    let records = JsonRecords::key(key).extract(&body);
    assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[test]
fn test_key_missing_yields_nothing() {
    // Google omits the list key entirely on empty pages
    let records = JsonRecords::key("users").extract(&json!({"kind": "admin#directory#users"}));
    assert!(records.is_empty());
}

#[test]
fn test_null_body_yields_nothing() {
    assert!(JsonRecords::key("items").extract(&Value::Null).is_empty());
    assert!(JsonRecords::bare_array().extract(&Value::Null).is_empty());
}

#[test]
fn test_key_null_value_yields_nothing() {
    let records = JsonRecords::key("items").extract(&json!({"items": null}));
    assert!(records.is_empty());
}

#[test]
fn test_bare_array() {
    let body = json!([{"uuid": "a"}, {"uuid": "b"}, {"uuid": "c"}]);
    let records = JsonRecords::bare_array().extract(&body);
    assert_eq!(records.len(), 3);
    assert_eq!(records[2], json!({"uuid": "c"}));
}

#[test]
fn test_single_object_becomes_one_record() {
    let records = JsonRecords::bare_array().extract(&json!({"id": "only"}));
    assert_eq!(records, vec![json!({"id": "only"})]);
}

#[test]
fn test_nested_path() {
    let body = json!({"data": {"rows": [1, 2, 3]}});
    assert_eq!(
        JsonRecords::key("data.rows").extract(&body),
        vec![json!(1), json!(2), json!(3)]
    );
    assert_eq!(JsonRecords::key("data.rows").record_path(), Some("data.rows"));
}

#[test]
fn test_closure_extractor() {
    let ids = |body: &Value| -> Vec<Value> {
        body.as_array()
            .map(|items| items.iter().filter_map(|i| i.get("id").cloned()).collect())
            .unwrap_or_default()
    };
    assert_eq!(
        ids.extract(&json!([{"id": 1}, {"x": 2}, {"id": 3}])),
        vec![json!(1), json!(3)]
    );
}
