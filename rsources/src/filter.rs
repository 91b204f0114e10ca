//! Task/source filters for status and failed-record queries.

/// Query key restricting results to specific task runs.
pub const TASK_RUN_ID_PARAM: &str = "task_run_id";

/// Query key restricting results to specific sources.
pub const SOURCE_ID_PARAM: &str = "source_id";

/// A restriction narrowing a query to specific tasks and/or sources.
///
/// An empty list leaves that dimension unrestricted. The two dimensions
/// compose with AND. Filtering only decides which nodes appear in a
/// response; it never alters stored counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Task run ids to include.
    pub task_run_id: Vec<String>,
    /// Source ids to include.
    pub source_id: Vec<String>,
}

impl JobFilter {
    /// Creates an unrestricted filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the filter to the given task run ids.
    #[must_use]
    pub fn with_task_run_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_run_id.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Restricts the filter to the given source ids.
    #[must_use]
    pub fn with_source_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_id.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Builds a filter from decoded query pairs.
    ///
    /// `task_run_id` and `source_id` may each appear any number of times.
    /// Values are kept in the order given. Other keys are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                TASK_RUN_ID_PARAM => filter.task_run_id.push(value.into()),
                SOURCE_ID_PARAM => filter.source_id.push(value.into()),
                _ => {}
            }
        }
        filter
    }

    /// Returns true if neither dimension is restricted.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.task_run_id.is_empty() && self.source_id.is_empty()
    }

    /// Returns true if the task passes the task dimension.
    #[must_use]
    pub fn includes_task(&self, task_run_id: &str) -> bool {
        self.task_run_id.is_empty() || self.task_run_id.iter().any(|id| id == task_run_id)
    }

    /// Returns true if the source passes the source dimension.
    #[must_use]
    pub fn includes_source(&self, source_id: &str) -> bool {
        self.source_id.is_empty() || self.source_id.iter().any(|id| id == source_id)
    }

    /// Returns true if the (task, source) pair passes both dimensions.
    #[must_use]
    pub fn includes(&self, task_run_id: &str, source_id: &str) -> bool {
        self.includes_task(task_run_id) && self.includes_source(source_id)
    }
}
