//! In-memory status store.
//!
//! Keeps one entry per job run in a [`DashMap`], so writers touching
//! different runs never contend. Within a run, counter rows live in a
//! `BTreeMap` keyed by [`JobTargetKey`], which gives the same ordering a
//! relational store produces with `ORDER BY task_run_id, source_id,
//! destination_id`. Failed records keep insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::value::RawValue;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::errors::JobServiceError;
use crate::filter::JobFilter;
use crate::records::{FailedRecord, FailedRecords};
use crate::service::JobService;
use crate::status::{JobStatus, JobTargetKey, Stats, StatusAggregator};

#[derive(Debug)]
struct RunState {
    stats: BTreeMap<JobTargetKey, Stats>,
    failed_records: Vec<FailedRecord>,
    // (target, raw record id) of every entry in `failed_records`
    recorded: HashSet<(JobTargetKey, String)>,
    updated_at: DateTime<Utc>,
}

impl RunState {
    fn new() -> Self {
        Self {
            stats: BTreeMap::new(),
            failed_records: Vec::new(),
            recorded: HashSet::new(),
            updated_at: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A [`JobService`] backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryJobService {
    runs: DashMap<String, RunState>,
}

impl MemoryJobService {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds counters to the row for `key`, creating the run as needed.
    pub fn increment_stats(&self, job_run_id: &str, key: JobTargetKey, stats: Stats) {
        let mut run = self
            .runs
            .entry(job_run_id.to_string())
            .or_insert_with(RunState::new);
        *run.stats.entry(key).or_default() += stats;
        run.touch();
    }

    /// Records failed events for `key`, creating the run as needed.
    ///
    /// A record already stored for the same key with the same raw id is
    /// skipped. Returns how many records were added.
    pub fn add_failed_records<I>(&self, job_run_id: &str, key: &JobTargetKey, record_ids: I) -> usize
    where
        I: IntoIterator<Item = Box<RawValue>>,
    {
        let mut run = self
            .runs
            .entry(job_run_id.to_string())
            .or_insert_with(RunState::new);
        let mut added = 0;
        for record_id in record_ids {
            if !run
                .recorded
                .insert((key.clone(), record_id.get().to_string()))
            {
                continue;
            }
            run.failed_records
                .push(FailedRecord::new(job_run_id, key, record_id));
            added += 1;
        }
        run.touch();
        added
    }

    /// Removes every run last updated before `cutoff`.
    ///
    /// Returns how many runs were removed.
    pub fn purge_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.runs.len();
        self.runs.retain(|_, run| run.updated_at >= cutoff);
        before.saturating_sub(self.runs.len())
    }

    /// Returns the number of tracked runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }
}

#[async_trait]
impl JobService for MemoryJobService {
    async fn delete(&self, job_run_id: &str) -> Result<(), JobServiceError> {
        if self.runs.remove(job_run_id).is_some() {
            debug!(job_run_id, "Deleted job run state");
        }
        Ok(())
    }

    async fn get_status(
        &self,
        job_run_id: &str,
        filter: &JobFilter,
    ) -> Result<JobStatus, JobServiceError> {
        let status = {
            let run = self
                .runs
                .get(job_run_id)
                .ok_or(JobServiceError::StatusNotFound)?;
            StatusAggregator::assemble(job_run_id, run.stats.iter())
        };
        Ok(status.filtered(filter))
    }

    async fn get_failed_records(
        &self,
        job_run_id: &str,
        filter: &JobFilter,
    ) -> Result<FailedRecords, JobServiceError> {
        let records: FailedRecords = {
            let run = self
                .runs
                .get(job_run_id)
                .ok_or(JobServiceError::StatusNotFound)?;
            run.failed_records.iter().cloned().collect()
        };
        Ok(records.filtered(filter))
    }
}
