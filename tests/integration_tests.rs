//! Integration tests using mock HTTP servers
//!
//! Tests the full flow: settings file → vendor client → projection → BigQuery insert

use async_trait::async_trait;
use platform_clients::clients::{BigQueryClient, EntraClient, OktaClient};
use platform_clients::decode::JsonRecords;
use platform_clients::engine::{CollectingObserver, RetrievalEvent};
use platform_clients::http::{PageFetcher, PageResponse};
use platform_clients::pagination::{BodyTokenPaginator, PageRequest};
use platform_clients::{
    BackoffPolicy, ClientSettings, FieldSpec, FieldType, Result, RetrievalEngine, TableSchema,
    TerminationReason,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_file(base_url: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "base_url: \"{base_url}\"\nretry:\n  max_retries: 2\n  base_backoff_ms: 1\n  max_backoff_ms: 5\ninsert_chunk_size: 2\n"
    )
    .unwrap();
    file
}

// ============================================================================
// Okta → BigQuery
// ============================================================================

#[tokio::test]
async fn test_okta_users_projected_into_bigquery() {
    let okta_server = MockServer::start().await;
    let bq_server = MockServer::start().await;
    let next = format!(r#"<{}/users?after=2>; rel="next""#, okta_server.uri());

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param_is_missing("after"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    {"id": "00u1", "status": "DEPROVISIONED", "profile": {"login": "a@x", "mobilePhone": null}},
                    {"id": "00u2", "status": "DEPROVISIONED", "profile": "garbage"},
                ]))
                .insert_header("Link", next.as_str()),
        )
        .mount(&okta_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("after", "2"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&okta_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("after", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "00u3", "status": "DEPROVISIONED", "profile": {"login": "c@x"}, "_links": {}},
        ])))
        .mount(&okta_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/projects/proj/datasets/okta/tables/users/insertAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&bq_server)
        .await;

    let okta_settings = ClientSettings::from_file(settings_file(&okta_server.uri()).path()).unwrap();
    let bq_settings = ClientSettings::from_file(settings_file(&bq_server.uri()).path()).unwrap();

    let okta = OktaClient::new("acme", "token", &okta_settings).unwrap();
    let users = okta.fetch_deactivated_users().await.unwrap();
    assert_eq!(users.reason, TerminationReason::Completed);
    assert_eq!(users.len(), 3);
    assert_eq!(users.retries, 1);

    let schema = TableSchema::new(vec![
        FieldSpec::new("id", FieldType::String).required(),
        FieldSpec::new("status", FieldType::String),
        FieldSpec::record("profile", vec![FieldSpec::new("login", FieldType::String)]),
    ]);

    let bigquery = BigQueryClient::new("proj", "bq-token", &bq_settings).unwrap();
    let options = bigquery.insert_options().with_record_load_time(false);
    let summary = bigquery
        .clean_and_insert_rows("okta", "users", &users.records, &schema, options)
        .await
        .unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.chunks, 2);

    let requests = bq_server.received_requests().await.unwrap();
    let first: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        first["rows"],
        json!([
            {"json": {"id": "00u1", "status": "DEPROVISIONED", "profile": {"login": "a@x"}}},
            {"json": {"id": "00u2", "status": "DEPROVISIONED"}},
        ])
    );
}

// ============================================================================
// Entra with observer
// ============================================================================

#[tokio::test]
async fn test_entra_events_observed() {
    let server = MockServer::start().await;
    let next = format!("{}/users?$skiptoken=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param_is_missing("$skiptoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "1"}],
            "@odata.nextLink": next,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("$skiptoken", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream"))
        .expect(1)
        .mount(&server)
        .await;

    let observer = Arc::new(CollectingObserver::new());
    let settings = ClientSettings::default().with_base_url(server.uri());
    let entra = EntraClient::new("t", &settings)
        .unwrap()
        .with_observer(observer.clone());

    let err = entra.fetch_all_users().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let events = observer.events();
    assert!(matches!(events[0], RetrievalEvent::PageFetched { page: 1, records: 1 }));
    assert!(matches!(events[1], RetrievalEvent::HttpError { status: 500, .. }));
    assert_eq!(observer.reasons(), vec![TerminationReason::HttpError]);
}

// ============================================================================
// Custom fetcher through the public engine API
// ============================================================================

struct Pages {
    bodies: Mutex<Vec<Value>>,
}

#[async_trait]
impl PageFetcher for Pages {
    async fn fetch(&self, _request: &PageRequest) -> Result<PageResponse> {
        let mut bodies = self.bodies.lock().unwrap();
        Ok(if bodies.is_empty() {
            PageResponse::json(429, Value::Null).with_header("retry-after", "0")
        } else {
            PageResponse::json(200, bodies.remove(0))
        })
    }
}

#[tokio::test]
async fn test_engine_with_custom_fetcher() {
    let fetcher = Pages {
        bodies: Mutex::new(vec![
            json!({"items": [1, 2], "next": "b"}),
            json!({"items": [3], "next": "c"}),
        ]),
    };
    let engine = RetrievalEngine::new(
        BackoffPolicy::new(1).with_backoff(Duration::from_millis(1), Duration::from_millis(1)),
    );

    let retrieval = engine
        .retrieve_all(
            &fetcher,
            PageRequest::cursor("a"),
            &BodyTokenPaginator::new("next", "cursor"),
            &JsonRecords::key("items"),
        )
        .await
        .unwrap();

    assert_eq!(retrieval.reason, TerminationReason::RateLimitExhausted);
    assert_eq!(retrieval.records, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(retrieval.pages, 2);
}

// ============================================================================
// BigQuery query round trip
// ============================================================================

#[tokio::test]
async fn test_bigquery_query_with_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/projects/proj/queries"))
        .and(body_json(json!({
            "query": "SELECT login, active FROM okta.users",
            "useLegacySql": false,
            "timeoutMs": 60000,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobReference": {"jobId": "j"},
            "jobComplete": true,
            "schema": {"fields": [
                {"name": "login", "type": "STRING"},
                {"name": "active", "type": "BOOLEAN"},
            ]},
            "rows": [
                {"f": [{"v": "a@x"}, {"v": "true"}]},
                {"f": [{"v": "b@x"}, {"v": "false"}]},
            ],
        })))
        .mount(&server)
        .await;

    let settings = ClientSettings::from_file(settings_file(&server.uri()).path()).unwrap();
    let bigquery = BigQueryClient::new("proj", "t", &settings).unwrap();
    let rows = bigquery
        .execute_query(
            "SELECT login, active FROM okta.users",
            Some(Duration::from_secs(60)),
        )
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![
            json!({"login": "a@x", "active": true}),
            json!({"login": "b@x", "active": false}),
        ]
    );
}
