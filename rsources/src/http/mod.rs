//! HTTP façade over a [`JobService`].
//!
//! This is the only layer that knows about status codes. Handlers decode
//! the path and query, make exactly one store call, and map the outcome:
//!
//! | Outcome | Delete | Status / failed records |
//! |---|---|---|
//! | success | 204, empty | 200, JSON |
//! | [`ErrorKind::NotFound`](crate::errors::ErrorKind::NotFound) | 500, error text | 404, `Status not found` |
//! | [`ErrorKind::Internal`](crate::errors::ErrorKind::Internal) | 500, error text | 500, error text |

mod handlers;
mod integration_tests;
mod response;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use crate::service::JobService;

pub use response::{error_response, text_response};

/// Route of a single job run's status.
pub const JOB_STATUS_ROUTE: &str = "/v1/job-status/:job_run_id";

/// Route of a job run's failed records.
pub const FAILED_RECORDS_ROUTE: &str = "/v1/job-status/:job_run_id/failed-records";

/// Default upper bound for a single store call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state of the job-status routes.
#[derive(Clone)]
pub struct AppState {
    service: Arc<dyn JobService>,
    request_timeout: Duration,
}

impl AppState {
    /// Creates state around a status store.
    #[must_use]
    pub fn new(service: Arc<dyn JobService>) -> Self {
        Self {
            service,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the upper bound for a single store call.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the configured store call timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

/// Builds the job-status router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            JOB_STATUS_ROUTE,
            get(handlers::get_status).delete(handlers::delete_job_run),
        )
        .route(FAILED_RECORDS_ROUTE, get(handlers::get_failed_records))
        .with_state(state)
}
