//! The status store contract consumed by the HTTP façade.

use async_trait::async_trait;

use crate::errors::JobServiceError;
use crate::filter::JobFilter;
use crate::records::FailedRecords;
use crate::status::JobStatus;

/// Reads, filters and deletes tracked job-run state.
///
/// Implementations own counter accumulation. Callers make one call per
/// request and never retry. Dropping a returned future must abandon the
/// underlying work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobService: Send + Sync {
    /// Removes all state tracked for the job run.
    ///
    /// Deleting a run that does not exist succeeds.
    async fn delete(&self, job_run_id: &str) -> Result<(), JobServiceError>;

    /// Returns the status tree of the job run, pruned by `filter`.
    ///
    /// Fails with [`JobServiceError::StatusNotFound`] when no state exists
    /// for the run. A run whose nodes are all filtered out yields an empty
    /// task list instead.
    async fn get_status(
        &self,
        job_run_id: &str,
        filter: &JobFilter,
    ) -> Result<JobStatus, JobServiceError>;

    /// Returns the failed records of the job run that pass `filter`.
    async fn get_failed_records(
        &self,
        job_run_id: &str,
        filter: &JobFilter,
    ) -> Result<FailedRecords, JobServiceError>;
}
