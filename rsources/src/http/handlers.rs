//! Job-status route handlers.

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::future::Future;
use tracing::{debug, error};

use super::response::{error_response, text_response};
use super::AppState;
use crate::errors::{ErrorKind, JobServiceError};
use crate::filter::JobFilter;

/// `DELETE /v1/job-status/{job_run_id}`
pub(super) async fn delete_job_run(
    State(state): State<AppState>,
    Path(job_run_id): Path<String>,
) -> Response {
    debug!(job_run_id = %job_run_id, "Deleting job run state");
    match call_store(&state, state.service.delete(&job_run_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!(job_run_id = %job_run_id, error = %err, "Failed to delete job run state");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

/// `GET /v1/job-status/{job_run_id}`
pub(super) async fn get_status(
    State(state): State<AppState>,
    Path(job_run_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let filter = match parse_filter(query.as_deref()) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    debug!(job_run_id = %job_run_id, ?filter, "Getting job run status");
    match call_store(&state, state.service.get_status(&job_run_id, &filter)).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => {
            log_query_error("status", &job_run_id, &err);
            error_response(&err)
        }
    }
}

/// `GET /v1/job-status/{job_run_id}/failed-records`
pub(super) async fn get_failed_records(
    State(state): State<AppState>,
    Path(job_run_id): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let filter = match parse_filter(query.as_deref()) {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    debug!(job_run_id = %job_run_id, ?filter, "Getting failed records");
    match call_store(&state, state.service.get_failed_records(&job_run_id, &filter)).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            log_query_error("failed records", &job_run_id, &err);
            error_response(&err)
        }
    }
}

/// Decodes the raw query string into a filter.
///
/// A missing query string is an unrestricted filter.
fn parse_filter(query: Option<&str>) -> Result<JobFilter, Response> {
    let Some(query) = query else {
        return Ok(JobFilter::default());
    };
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .map(JobFilter::from_query_pairs)
        .map_err(|err| text_response(StatusCode::BAD_REQUEST, &format!("invalid query: {err}")))
}

/// Runs one store call, bounded by the configured timeout.
///
/// On expiry the store future is dropped, abandoning the call.
async fn call_store<T, F>(state: &AppState, call: F) -> Result<T, JobServiceError>
where
    F: Future<Output = Result<T, JobServiceError>>,
{
    let timeout = state.request_timeout;
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| JobServiceError::Timeout(timeout))?
}

fn log_query_error(query: &str, job_run_id: &str, err: &JobServiceError) {
    match err.kind() {
        ErrorKind::NotFound => {
            debug!(job_run_id = %job_run_id, "No {} tracked for job run", query);
        }
        ErrorKind::Internal => {
            error!(job_run_id = %job_run_id, error = %err, "Failed to get {}", query);
        }
    }
}
