//! BigQuery over the REST API
//!
//! Table management, streaming inserts through `insertAll`, and synchronous
//! queries whose `f`/`v` rows are converted back into JSON objects.

use super::base::{require, ApiCore};
use crate::auth::AuthConfig;
use crate::config::ClientSettings;
use crate::decode::RecordExtractor;
use crate::engine::{RetrievalObserver, TerminationReason};
use crate::error::{Error, Result};
use crate::output::{insert_in_chunks, InsertOptions, InsertSummary, RowSink};
use crate::pagination::{lookup_str, BodyTokenPaginator, PageRequest};
use crate::schema::{FieldMode, FieldSpec, FieldType, TableSchema};
use crate::types::QueryParams;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// BigQuery v2 endpoint
pub const BIGQUERY_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Longest accepted query timeout
pub const MAX_QUERY_TIMEOUT: Duration = Duration::from_secs(3600);

const QUERY_POLL_INTERVAL: Duration = Duration::from_millis(500);
const QUERY_POLL_WAIT_MS: u64 = 10_000;

/// BigQuery client scoped to one project
#[derive(Debug)]
pub struct BigQueryClient {
    core: ApiCore,
    project_id: String,
}

impl BigQueryClient {
    /// Create a client from an OAuth access token
    pub fn new(project_id: &str, access_token: &str, settings: &ClientSettings) -> Result<Self> {
        require("project_id", project_id)?;
        let core = ApiCore::new(settings, BIGQUERY_BASE_URL, AuthConfig::bearer(access_token))?;
        Ok(Self {
            core,
            project_id: project_id.to_string(),
        })
    }

    /// Send engine events to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetrievalObserver>) -> Self {
        self.core = self.core.with_observer(observer);
        self
    }

    /// Project the client is scoped to
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Insert options with the configured chunk size
    pub fn insert_options(&self) -> InsertOptions {
        self.core.settings().insert_options()
    }

    fn tables_path(&self, dataset_id: &str) -> String {
        format!("projects/{}/datasets/{dataset_id}/tables", self.project_id)
    }

    fn table_path(&self, dataset_id: &str, table_id: &str) -> String {
        format!("{}/{table_id}", self.tables_path(dataset_id))
    }

    /// Create a table with `schema`; returns the created table resource
    pub async fn create_table(
        &self,
        dataset_id: &str,
        table_id: &str,
        schema: &TableSchema,
    ) -> Result<Value> {
        require("dataset_id", dataset_id)?;
        require("table_id", table_id)?;
        let body = json!({
            "tableReference": {
                "projectId": self.project_id,
                "datasetId": dataset_id,
                "tableId": table_id,
            },
            "schema": schema,
        });

        let table = self
            .core
            .post("bigquery.create_table", &self.tables_path(dataset_id), body)
            .await?;
        info!(
            "Created table {}.{dataset_id}.{table_id}",
            self.project_id
        );
        Ok(table)
    }

    /// Schema of an existing table
    pub async fn get_table_schema(&self, dataset_id: &str, table_id: &str) -> Result<TableSchema> {
        require("dataset_id", dataset_id)?;
        require("table_id", table_id)?;
        let table = self
            .core
            .get(
                "bigquery.get_table",
                &self.table_path(dataset_id, table_id),
                QueryParams::new(),
            )
            .await?;

        match table.get("schema") {
            Some(schema) => Ok(serde_json::from_value(schema.clone())?),
            None => Ok(TableSchema::default()),
        }
    }

    /// Stream rows into a table in chunks.
    ///
    /// Any chunk reporting `insertErrors` aborts with `Error::InsertRows`.
    pub async fn insert_rows_json(
        &self,
        dataset_id: &str,
        table_id: &str,
        rows: Vec<Value>,
        options: InsertOptions,
    ) -> Result<InsertSummary> {
        require("dataset_id", dataset_id)?;
        require("table_id", table_id)?;
        let sink = TableSink {
            core: &self.core,
            path: format!("{}/insertAll", self.table_path(dataset_id, table_id)),
            table: format!("{dataset_id}.{table_id}"),
        };
        insert_in_chunks(&sink, rows, options).await
    }

    /// Project every row onto `schema`, then insert
    pub async fn clean_and_insert_rows(
        &self,
        dataset_id: &str,
        table_id: &str,
        rows: &[Value],
        schema: &TableSchema,
        options: InsertOptions,
    ) -> Result<InsertSummary> {
        let cleaned = rows.iter().map(|row| schema.project(row)).collect();
        self.insert_rows_json(dataset_id, table_id, cleaned, options)
            .await
    }

    /// Run a standard SQL query and return every result row as an object.
    ///
    /// `timeout` must be in (0, 3600] seconds; it bounds both the server-side
    /// wait and the time spent polling for completion.
    pub async fn execute_query(&self, sql: &str, timeout: Option<Duration>) -> Result<Vec<Value>> {
        require("sql", sql)?;
        if let Some(timeout) = timeout {
            validate_query_timeout(timeout)?;
        }

        let mut body = json!({"query": sql, "useLegacySql": false});
        if let Some(timeout) = timeout {
            body["timeoutMs"] = json!(timeout.as_millis() as u64);
        }

        let queries_path = format!("projects/{}/queries", self.project_id);
        let mut response = self
            .core
            .post("bigquery.execute_query", &queries_path, body)
            .await?;

        let job_id = response
            .pointer("/jobReference/jobId")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::decode("Query response has no jobReference.jobId"))?
            .to_string();
        let location = response
            .pointer("/jobReference/location")
            .and_then(Value::as_str)
            .map(str::to_string);
        let results_path = format!("{queries_path}/{job_id}");

        let deadline = Instant::now() + timeout.unwrap_or(MAX_QUERY_TIMEOUT);
        while !job_complete(&response) {
            if Instant::now() >= deadline {
                return Err(Error::Other(format!(
                    "Query job {job_id} did not complete before the timeout"
                )));
            }
            debug!("Query job {job_id} still running");
            tokio::time::sleep(QUERY_POLL_INTERVAL).await;

            let mut query = QueryParams::new();
            query.insert("timeoutMs".to_string(), QUERY_POLL_WAIT_MS.to_string());
            if let Some(ref location) = location {
                query.insert("location".to_string(), location.clone());
            }
            response = self
                .core
                .get("bigquery.get_query_results", &results_path, query)
                .await?;
        }

        let schema: TableSchema = match response.get("schema") {
            Some(schema) => serde_json::from_value(schema.clone())?,
            None => TableSchema::default(),
        };
        let extractor = QueryRows::new(schema);
        let mut rows = extractor.extract(&response);

        if let Some(token) = lookup_str(&response, "pageToken") {
            let initial = PageRequest::url(results_path)
                .param_opt("location", location)
                .param("pageToken", token);
            let rest = self
                .core
                .get_all(
                    "bigquery.get_query_results",
                    initial,
                    &BodyTokenPaginator::new("pageToken", "pageToken"),
                    &extractor,
                )
                .await?;
            if rest.reason != TerminationReason::Completed {
                return Err(Error::Other(format!(
                    "Query job {job_id} results stopped early: {}",
                    rest.reason
                )));
            }
            rows.extend(rest.records);
        }

        info!("Query job {job_id} returned {} rows", rows.len());
        Ok(rows)
    }
}

/// Check a query timeout against the accepted range
pub fn validate_query_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() || timeout > MAX_QUERY_TIMEOUT {
        return Err(Error::invalid_argument(
            "Timeout must be a positive number of seconds up to 3600",
        ));
    }
    Ok(())
}

fn job_complete(response: &Value) -> bool {
    response
        .get("jobComplete")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

// ============================================================================
// Insert Sink
// ============================================================================

/// `tabledata.insertAll` for one table
struct TableSink<'a> {
    core: &'a ApiCore,
    path: String,
    table: String,
}

#[async_trait]
impl RowSink for TableSink<'_> {
    async fn insert_chunk(&self, rows: &[Value]) -> Result<Vec<Value>> {
        let body = json!({
            "kind": "bigquery#tableDataInsertAllRequest",
            "rows": rows.iter().map(|row| json!({"json": row})).collect::<Vec<_>>(),
        });
        // One request per chunk; a 429 here fails the chunk
        let response = self.core.http().post_json(&self.path, body).await?;

        Ok(match response.get("insertErrors") {
            Some(Value::Array(errors)) => errors.clone(),
            _ => Vec::new(),
        })
    }

    fn name(&self) -> &str {
        &self.table
    }
}

// ============================================================================
// Query Rows
// ============================================================================

/// Converts `rows` of a query response into objects keyed by column name
#[derive(Debug, Clone)]
pub struct QueryRows {
    schema: TableSchema,
}

impl QueryRows {
    /// Extractor for results with this schema
    pub fn new(schema: TableSchema) -> Self {
        Self { schema }
    }
}

impl RecordExtractor for QueryRows {
    fn extract(&self, body: &Value) -> Vec<Value> {
        body.get("rows")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| row_to_object(row, &self.schema.fields))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Convert one `{"f": [{"v": ...}]}` row.
///
/// INTEGER, FLOAT and BOOLEAN cells become JSON numbers and booleans; other
/// scalars keep the string form the API returns.
pub fn row_to_object(row: &Value, fields: &[FieldSpec]) -> Value {
    let cells = row.get("f").and_then(Value::as_array);
    let mut out = Map::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let cell = cells
            .and_then(|cells| cells.get(index))
            .and_then(|cell| cell.get("v"))
            .unwrap_or(&Value::Null);
        out.insert(field.name.clone(), convert_cell(cell, field));
    }
    Value::Object(out)
}

fn convert_cell(value: &Value, field: &FieldSpec) -> Value {
    if field.mode != FieldMode::Repeated {
        return convert_value(value, field);
    }
    let items = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| convert_value(item.get("v").unwrap_or(&Value::Null), field))
                .collect()
        })
        .unwrap_or_default();
    Value::Array(items)
}

fn convert_value(value: &Value, field: &FieldSpec) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    if let Some(fields) = field.subfields() {
        return row_to_object(value, fields);
    }

    let Some(text) = value.as_str() else {
        return value.clone();
    };
    let converted = match field.field_type {
        FieldType::Integer | FieldType::Int64 => text.parse::<i64>().ok().map(Value::from),
        FieldType::Float | FieldType::Float64 => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        FieldType::Boolean | FieldType::Bool => match text {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    converted.unwrap_or_else(|| value.clone())
}
