//! Vendor clients
//!
//! Thin wrappers that authenticate, pick the endpoint and hand the engine
//! the vendor's pagination idiom and record key.
//!
//! | Client | Pagination | Records |
//! |--------|------------|---------|
//! | Okta | `Link` header | bare array |
//! | Entra (Graph) | `@odata.nextLink` | `value` |
//! | Google Admin | `nextPageToken` | `users` / `items` / `usageReports` |
//! | HiBob | single POST | `employees` |
//! | Dataform | single resource | whole body |
//! | Cloud Identity | single resource | whole body |
//! | BigQuery | `pageToken` (query results) | `rows` |

mod bigquery;
mod cloud_identity;
mod base;
mod dataform;
mod entra;
mod google_admin;
mod hibob;
mod okta;

pub use base::{ApiCore, WholeBody};
pub use bigquery::{
    row_to_object, validate_query_timeout, BigQueryClient, QueryRows, BIGQUERY_BASE_URL,
    MAX_QUERY_TIMEOUT,
};
pub use cloud_identity::{CloudIdentityClient, CLOUD_IDENTITY_BASE_URL};
pub use dataform::{DataformClient, WorkflowState, DATAFORM_BASE_URL};
pub use entra::{created_date_filter, EntraClient, GRAPH_BASE_URL};
pub use google_admin::{GoogleAdminClient, ADMIN_BASE_URL};
pub use hibob::{HiBobClient, EMPLOYEE_FIELDS, HIBOB_BASE_URL};
pub use okta::{OktaClient, DEPROVISIONED_FILTER};
