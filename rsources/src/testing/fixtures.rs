//! Fixtures for job-run status tests.

use serde_json::value::RawValue;

use crate::filter::JobFilter;
use crate::records::FailedRecord;
use crate::status::{DestinationStatus, JobStatus, SourceStatus, Stats, TaskStatus};

/// Parses raw JSON text into an owned [`RawValue`].
///
/// # Panics
///
/// Panics if `raw` is not valid JSON.
#[must_use]
pub fn raw_json(raw: &str) -> Box<RawValue> {
    RawValue::from_string(raw.to_string())
        .unwrap_or_else(|err| panic!("invalid raw JSON {raw:?}: {err}"))
}

/// Builds a failed record from plain ids and raw `record_id` text.
#[must_use]
pub fn failed_record(
    job_run_id: &str,
    task_run_id: &str,
    source_id: &str,
    destination_id: &str,
    record_id: &str,
) -> FailedRecord {
    FailedRecord {
        job_run_id: job_run_id.to_string(),
        task_run_id: task_run_id.to_string(),
        source_id: source_id.to_string(),
        destination_id: destination_id.to_string(),
        record_id: raw_json(record_id),
    }
}

/// The filter `task_run_id=[t1,t2], source_id=[s1]`.
#[must_use]
pub fn scenario_filter() -> JobFilter {
    JobFilter::new()
        .with_task_run_ids(["t1", "t2"])
        .with_source_ids(["s1"])
}

/// Two tasks `t1` and `t2`, each with source `s1` forwarding to `d1` and
/// `d2` respectively. Every node has stats `{1, 1, 0}` and is not completed.
#[must_use]
pub fn two_task_status(job_run_id: &str) -> JobStatus {
    let stats = Stats::new(1, 1, 0);
    StatusBuilder::new(job_run_id)
        .source("t1", "s1", false, stats)
        .destination("d1", false, stats)
        .source("t2", "s1", false, stats)
        .destination("d2", false, stats)
        .build()
}

/// Builds status trees node by node, in the order given.
#[derive(Debug, Clone)]
pub struct StatusBuilder {
    status: JobStatus,
}

impl StatusBuilder {
    /// Starts a tree for the job run.
    #[must_use]
    pub fn new(job_run_id: &str) -> Self {
        Self {
            status: JobStatus::empty(job_run_id),
        }
    }

    /// Appends a source, creating its task when the task is not the last
    /// one added.
    #[must_use]
    pub fn source(mut self, task_run_id: &str, source_id: &str, completed: bool, stats: Stats) -> Self {
        if self.status.tasks.last().map(|t| t.id.as_str()) != Some(task_run_id) {
            self.status.tasks.push(TaskStatus {
                id: task_run_id.to_string(),
                sources: Vec::new(),
            });
        }
        if let Some(task) = self.status.tasks.last_mut() {
            task.sources.push(SourceStatus {
                id: source_id.to_string(),
                completed,
                stats,
                destinations: Vec::new(),
            });
        }
        self
    }

    /// Appends a destination to the last source added.
    #[must_use]
    pub fn destination(mut self, destination_id: &str, completed: bool, stats: Stats) -> Self {
        if let Some(source) = self
            .status
            .tasks
            .last_mut()
            .and_then(|task| task.sources.last_mut())
        {
            source.destinations.push(DestinationStatus {
                id: destination_id.to_string(),
                completed,
                stats,
            });
        }
        self
    }

    /// Returns the tree.
    #[must_use]
    pub fn build(self) -> JobStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_groups_sources_under_last_task() {
        let status = StatusBuilder::new("r")
            .source("t1", "s1", true, Stats::default())
            .source("t1", "s2", true, Stats::default())
            .source("t2", "s1", true, Stats::default())
            .build();
        assert_eq!(status.tasks.len(), 2);
        assert_eq!(status.tasks[0].sources.len(), 2);
    }

    #[test]
    fn test_raw_json_keeps_text() {
        assert_eq!(raw_json(r#"{"id": 1}"#).get(), r#"{"id": 1}"#);
    }
}
