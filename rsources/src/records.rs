//! Individually failed records.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::filter::JobFilter;
use crate::status::JobTargetKey;

/// A single event that failed terminally.
///
/// `record_id` is caller-defined JSON. It is kept as raw text and written
/// back out byte-for-byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRecord {
    /// Job run id.
    pub job_run_id: String,
    /// Task run id.
    pub task_run_id: String,
    /// Source id.
    pub source_id: String,
    /// Destination id.
    pub destination_id: String,
    /// Opaque record identifier.
    pub record_id: Box<RawValue>,
}

impl FailedRecord {
    /// Creates a record for the given target.
    #[must_use]
    pub fn new(job_run_id: impl Into<String>, key: &JobTargetKey, record_id: Box<RawValue>) -> Self {
        Self {
            job_run_id: job_run_id.into(),
            task_run_id: key.task_run_id.clone(),
            source_id: key.source_id.clone(),
            destination_id: key.destination_id.clone(),
            record_id,
        }
    }
}

impl PartialEq for FailedRecord {
    fn eq(&self, other: &Self) -> bool {
        self.job_run_id == other.job_run_id
            && self.task_run_id == other.task_run_id
            && self.source_id == other.source_id
            && self.destination_id == other.destination_id
            && self.record_id.get() == other.record_id.get()
    }
}

impl Eq for FailedRecord {}

/// Failed records of a job run, in store order.
///
/// Serializes as a JSON array; an empty list is `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailedRecords(pub Vec<FailedRecord>);

impl FailedRecords {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only the records whose task and source pass the filter.
    #[must_use]
    pub fn filtered(mut self, filter: &JobFilter) -> Self {
        if !filter.is_unrestricted() {
            self.0
                .retain(|record| filter.includes(&record.task_run_id, &record.source_id));
        }
        self
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, FailedRecord> {
        self.0.iter()
    }
}

impl From<Vec<FailedRecord>> for FailedRecords {
    fn from(records: Vec<FailedRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<FailedRecord> for FailedRecords {
    fn from_iter<I: IntoIterator<Item = FailedRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FailedRecords {
    type Item = FailedRecord;
    type IntoIter = std::vec::IntoIter<FailedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
