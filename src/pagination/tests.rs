//! Tests for pagination module

use super::*;
use crate::http::PageResponse;
use crate::types::QueryParams;
use serde_json::json;

fn ok(body: serde_json::Value) -> PageResponse {
    PageResponse::json(200, body)
}

// ============================================================================
// PageRequest / NextPage Tests
// ============================================================================

#[test]
fn test_page_request_params() {
    let request = PageRequest::url("https://x.okta.com/api/v1/logs")
        .param("limit", 1000)
        .param_opt("since", Some("2024-01-01T00:00:00Z"))
        .param_opt("until", None::<&str>);

    let params = request.params().unwrap();
    assert_eq!(params.get("limit"), Some(&"1000".to_string()));
    assert_eq!(
        params.get("since"),
        Some(&"2024-01-01T00:00:00Z".to_string())
    );
    assert!(!params.contains_key("until"));
}

#[test]
fn test_page_request_equality_is_structural() {
    let a = PageRequest::url("/users").param("b", "2").param("a", "1");
    let b = PageRequest::url("/users").param("a", "1").param("b", "2");
    assert_eq!(a, b);
    assert_ne!(a, PageRequest::url("/users"));
    assert_ne!(PageRequest::cursor("t"), PageRequest::url("t"));
}

#[test]
fn test_page_request_display() {
    let request = PageRequest::url("/users").param("limit", 2).param("q", "x");
    assert_eq!(request.to_string(), "/users?limit=2&q=x");
    assert_eq!(PageRequest::cursor("abc").to_string(), "cursor:abc");
}

#[test]
fn test_cursor_ignores_params() {
    let request = PageRequest::cursor("abc").param("limit", 5);
    assert_eq!(request, PageRequest::cursor("abc"));
    assert!(request.params().is_none());
    assert!(request.link_url().is_none());
}

#[test]
fn test_next_page_from_option() {
    let next: NextPage = Some(PageRequest::cursor("t")).into();
    assert!(next.is_continue());
    assert_eq!(next.into_request(), Some(PageRequest::cursor("t")));

    let done: NextPage = None.into();
    assert!(done.is_done());
    assert_eq!(done.into_request(), None);
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_lookup_exact_key_with_dots() {
    let body = json!({"@odata.nextLink": "https://graph/next"});
    assert_eq!(
        lookup_str(&body, "@odata.nextLink"),
        Some("https://graph/next")
    );
}

#[test]
fn test_lookup_nested_path() {
    let body = json!({"meta": {"next": "n2"}});
    assert_eq!(lookup_str(&body, "meta.next"), Some("n2"));
    assert_eq!(lookup_str(&body, "$.meta.next"), Some("n2"));
    assert_eq!(lookup(&body, "meta.missing"), None);
}

#[test]
fn test_lookup_str_ignores_empty_and_non_strings() {
    let body = json!({"nextPageToken": "", "count": 3});
    assert_eq!(lookup_str(&body, "nextPageToken"), None);
    assert_eq!(lookup_str(&body, "count"), None);
}

// ============================================================================
// BodyTokenPaginator Tests
// ============================================================================

#[test]
fn test_body_token_carries_params_forward() {
    let paginator = BodyTokenPaginator::default();
    let current = PageRequest::url("admin/directory/v1/users")
        .param("customer", "my_customer")
        .param("maxResults", 500);

    let next = paginator.next_page(&current, &ok(json!({"users": [], "nextPageToken": "p2"})));

    let mut expected = QueryParams::new();
    expected.insert("customer".into(), "my_customer".into());
    expected.insert("maxResults".into(), "500".into());
    expected.insert("pageToken".into(), "p2".into());
    assert_eq!(
        next,
        NextPage::Continue(PageRequest::with_params("admin/directory/v1/users", expected))
    );
}

#[test]
fn test_body_token_replaces_previous_token() {
    let paginator = BodyTokenPaginator::default();
    let current = PageRequest::url("/u").param("pageToken", "p2");

    let next = paginator
        .next_page(&current, &ok(json!({"nextPageToken": "p3"})))
        .into_request()
        .unwrap();

    assert_eq!(next.params().unwrap().get("pageToken"), Some(&"p3".to_string()));
}

#[test]
fn test_body_token_done_without_token() {
    let paginator = BodyTokenPaginator::default();
    let current = PageRequest::url("/u");

    assert!(paginator.next_page(&current, &ok(json!({"users": []}))).is_done());
    assert!(paginator
        .next_page(&current, &ok(json!({"nextPageToken": ""})))
        .is_done());
    assert!(paginator.next_page(&current, &ok(json!(null))).is_done());
}

#[test]
fn test_body_token_on_cursor() {
    let paginator = BodyTokenPaginator::new("pageToken", "pageToken");
    let next = paginator.next_page(&PageRequest::cursor("a"), &ok(json!({"pageToken": "b"})));
    assert_eq!(next, NextPage::Continue(PageRequest::cursor("b")));
}

// ============================================================================
// NextUrlPaginator Tests
// ============================================================================

#[test]
fn test_odata_next_link_drops_params() {
    let paginator = NextUrlPaginator::odata();
    let current = PageRequest::url("https://graph.microsoft.com/v1.0/users").param("$top", 999);
    let link = "https://graph.microsoft.com/v1.0/users?$skiptoken=X";

    let next = paginator.next_page(&current, &ok(json!({"value": [], "@odata.nextLink": link})));

    assert_eq!(next, NextPage::Continue(PageRequest::url(link)));
}

#[test]
fn test_odata_done_without_link() {
    let paginator = NextUrlPaginator::odata();
    let next = paginator.next_page(&PageRequest::url("/users"), &ok(json!({"value": [1]})));
    assert!(next.is_done());
}

// ============================================================================
// LinkHeaderPaginator Tests
// ============================================================================

#[test]
fn test_parse_link_header_next() {
    let header = r#"<https://x.okta.com/api/v1/users?limit=2>; rel="self", <https://x.okta.com/api/v1/users?after=00u2&limit=2>; rel="next""#;

    assert_eq!(
        parse_link_header(header, "next"),
        Some("https://x.okta.com/api/v1/users?after=00u2&limit=2".to_string())
    );
    assert_eq!(
        parse_link_header(header, "self"),
        Some("https://x.okta.com/api/v1/users?limit=2".to_string())
    );
    assert_eq!(parse_link_header(header, "prev"), None);
}

#[test]
fn test_parse_link_header_comma_in_url() {
    let header = r#"<https://api/logs?filter=a,b>; rel="next""#;
    assert_eq!(
        parse_link_header(header, "next"),
        Some("https://api/logs?filter=a,b".to_string())
    );
}

#[test]
fn test_parse_link_header_rel_list() {
    let header = r#"<https://api/p2>; rel="next last""#;
    assert_eq!(parse_link_header(header, "last"), Some("https://api/p2".to_string()));
}

#[test]
fn test_parse_link_header_malformed() {
    assert_eq!(parse_link_header("", "next"), None);
    assert_eq!(parse_link_header("<unterminated; rel=next", "next"), None);
    assert_eq!(parse_link_header("https://api/p2; rel=next", "next"), None);
}

#[test]
fn test_link_header_separate_headers() {
    let paginator = LinkHeaderPaginator::default();
    let response = ok(json!([{"id": 1}]))
        .with_header("link", r#"<https://x.okta.com/api/v1/logs?limit=10>; rel="self""#)
        .with_header(
            "link",
            r#"<https://x.okta.com/api/v1/logs?after=abc&limit=10>; rel="next""#,
        );
    let current = PageRequest::url("https://x.okta.com/api/v1/logs").param("limit", 10);

    let next = paginator.next_page(&current, &response);

    assert_eq!(
        next,
        NextPage::Continue(PageRequest::url(
            "https://x.okta.com/api/v1/logs?after=abc&limit=10"
        ))
    );
}

#[test]
fn test_link_header_relative_target() {
    let paginator = LinkHeaderPaginator::default();
    let response = ok(json!([])).with_header("link", r#"</api/v1/users?after=9>; rel="next""#);
    let current = PageRequest::url("https://x.okta.com/api/v1/users");

    let next = paginator.next_page(&current, &response).into_request().unwrap();

    assert_eq!(
        next.link_url(),
        Some("https://x.okta.com/api/v1/users?after=9")
    );
}

#[test]
fn test_link_header_missing() {
    let paginator = LinkHeaderPaginator::default();
    let current = PageRequest::url("https://x.okta.com/api/v1/users");
    assert!(paginator.next_page(&current, &ok(json!([]))).is_done());
}

#[test]
fn test_link_header_stop_on_empty() {
    let link = r#"<https://x.okta.com/api/v1/logs?after=1>; rel="next""#;
    let current = PageRequest::url("https://x.okta.com/api/v1/logs");

    let follows = LinkHeaderPaginator::default();
    assert!(follows
        .next_page(&current, &ok(json!([])).with_header("link", link))
        .is_continue());

    let stops = LinkHeaderPaginator::default().stop_on_empty();
    assert!(stops
        .next_page(&current, &ok(json!([])).with_header("link", link))
        .is_done());
    assert!(stops
        .next_page(&current, &ok(json!([{"uuid": "e1"}])).with_header("link", link))
        .is_continue());
}

#[test]
fn test_no_paginator() {
    let next = NoPaginator.next_page(&PageRequest::url("/x"), &ok(json!({"a": 1})));
    assert!(next.is_done());
}
