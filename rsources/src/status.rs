//! Hierarchical job-run status: run → tasks → sources → destinations.
//!
//! Stores keep one counter row per [`JobTargetKey`]. The
//! [`StatusAggregator`] folds those rows into a [`JobStatus`] tree and
//! [`JobStatus::filtered`] prunes a tree with a [`JobFilter`]. Neither step
//! recomputes counters: stats on every node are returned exactly as stored.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::filter::JobFilter;

/// Event counters for a source or destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Events received.
    #[serde(rename = "in")]
    pub r#in: u64,
    /// Events successfully forwarded.
    pub out: u64,
    /// Events that failed terminally.
    pub failed: u64,
}

impl Stats {
    /// Creates a stats value.
    #[must_use]
    pub const fn new(r#in: u64, out: u64, failed: u64) -> Self {
        Self { r#in, out, failed }
    }

    /// Returns true if every received event has been accounted for.
    ///
    /// `out + failed <= in` is not validated here; a store that reports
    /// more outputs than inputs simply never settles.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.r#in == self.out.saturating_add(self.failed)
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.r#in = self.r#in.saturating_add(rhs.r#in);
        self.out = self.out.saturating_add(rhs.out);
        self.failed = self.failed.saturating_add(rhs.failed);
    }
}

/// Addresses one counter row within a job run.
///
/// An empty `destination_id` holds the source-level counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobTargetKey {
    /// Task run id.
    pub task_run_id: String,
    /// Source id.
    pub source_id: String,
    /// Destination id, empty for source-level counters.
    #[serde(default)]
    pub destination_id: String,
}

impl JobTargetKey {
    /// Creates a key for destination-level counters.
    #[must_use]
    pub fn new(
        task_run_id: impl Into<String>,
        source_id: impl Into<String>,
        destination_id: impl Into<String>,
    ) -> Self {
        Self {
            task_run_id: task_run_id.into(),
            source_id: source_id.into(),
            destination_id: destination_id.into(),
        }
    }

    /// Creates a key for source-level counters.
    #[must_use]
    pub fn source(task_run_id: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self::new(task_run_id, source_id, String::new())
    }

    /// Returns true if this key addresses source-level counters.
    #[must_use]
    pub fn is_source_level(&self) -> bool {
        self.destination_id.is_empty()
    }
}

/// Status of one destination under a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationStatus {
    /// Destination id.
    pub id: String,
    /// Whether the destination has drained.
    pub completed: bool,
    /// Destination counters.
    pub stats: Stats,
}

/// Status of one source under a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    /// Source id.
    pub id: String,
    /// Whether the source and all of its destinations have drained.
    pub completed: bool,
    /// Source-level counters.
    pub stats: Stats,
    /// Destinations in store order.
    #[serde(default)]
    pub destinations: Vec<DestinationStatus>,
}

/// Status of one task within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Task run id.
    pub id: String,
    /// Sources in store order.
    #[serde(default)]
    pub sources: Vec<SourceStatus>,
}

/// Status of a job run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Job run id.
    pub id: String,
    /// Tasks in store order.
    #[serde(default)]
    pub tasks: Vec<TaskStatus>,
}

impl JobStatus {
    /// Creates a status with no tasks.
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: Vec::new(),
        }
    }

    /// Prunes the tree to the nodes the filter includes.
    ///
    /// Excluded tasks are removed together with everything beneath them.
    /// When sources are restricted, a task left without sources is removed
    /// as well. Remaining nodes keep their order and stats.
    #[must_use]
    pub fn filtered(mut self, filter: &JobFilter) -> Self {
        if filter.is_unrestricted() {
            return self;
        }
        let restrict_sources = !filter.source_id.is_empty();
        self.tasks.retain_mut(|task| {
            if !filter.includes_task(&task.id) {
                return false;
            }
            task.sources.retain(|source| filter.includes_source(&source.id));
            !(restrict_sources && task.sources.is_empty())
        });
        self
    }

    /// Looks up a source node.
    #[must_use]
    pub fn source(&self, task_run_id: &str, source_id: &str) -> Option<&SourceStatus> {
        self.tasks
            .iter()
            .find(|task| task.id == task_run_id)
            .and_then(|task| task.sources.iter().find(|source| source.id == source_id))
    }

    /// Returns true if every source in the run has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.tasks
            .iter()
            .flat_map(|task| task.sources.iter())
            .all(|source| source.completed)
    }
}

/// Folds stored counter rows into a [`JobStatus`] tree.
///
/// Nodes appear in the order their first row is seen, so a store that
/// iterates rows in a stable order yields a stable tree.
#[derive(Debug, Clone, Default)]
pub struct StatusAggregator {
    status: JobStatus,
}

impl StatusAggregator {
    /// Starts aggregating rows for a job run.
    #[must_use]
    pub fn new(job_run_id: impl Into<String>) -> Self {
        Self {
            status: JobStatus::empty(job_run_id),
        }
    }

    /// Builds a tree from rows in one call.
    #[must_use]
    pub fn assemble<'a, I>(job_run_id: impl Into<String>, rows: I) -> JobStatus
    where
        I: IntoIterator<Item = (&'a JobTargetKey, &'a Stats)>,
    {
        let mut aggregator = Self::new(job_run_id);
        for (key, stats) in rows {
            aggregator.push(key, *stats);
        }
        aggregator.finish()
    }

    /// Adds one counter row.
    ///
    /// A repeated key adds to the counters already recorded for it.
    pub fn push(&mut self, key: &JobTargetKey, stats: Stats) {
        let source = self.source_mut(&key.task_run_id, &key.source_id);
        if key.is_source_level() {
            source.stats += stats;
            return;
        }
        match source
            .destinations
            .iter_mut()
            .find(|destination| destination.id == key.destination_id)
        {
            Some(destination) => destination.stats += stats,
            None => source.destinations.push(DestinationStatus {
                id: key.destination_id.clone(),
                completed: false,
                stats,
            }),
        }
    }

    /// Computes completion flags and returns the tree.
    #[must_use]
    pub fn finish(mut self) -> JobStatus {
        for source in self
            .status
            .tasks
            .iter_mut()
            .flat_map(|task| task.sources.iter_mut())
        {
            for destination in &mut source.destinations {
                destination.completed = destination.stats.is_settled();
            }
            source.completed = source.stats.is_settled()
                && source.destinations.iter().all(|destination| destination.completed);
        }
        self.status
    }

    fn source_mut(&mut self, task_run_id: &str, source_id: &str) -> &mut SourceStatus {
        let tasks = &mut self.status.tasks;
        let task_idx = match tasks.iter().position(|task| task.id == task_run_id) {
            Some(idx) => idx,
            None => {
                tasks.push(TaskStatus {
                    id: task_run_id.to_string(),
                    sources: Vec::new(),
                });
                tasks.len() - 1
            }
        };
        let sources = &mut tasks[task_idx].sources;
        let source_idx = match sources.iter().position(|source| source.id == source_id) {
            Some(idx) => idx,
            None => {
                sources.push(SourceStatus {
                    id: source_id.to_string(),
                    ..SourceStatus::default()
                });
                sources.len() - 1
            }
        };
        &mut sources[source_idx]
    }
}
