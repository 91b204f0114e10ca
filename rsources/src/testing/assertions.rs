//! Assertions for status trees.

use crate::status::JobStatus;

/// Asserts that the source ids of `task_run_id` are exactly `expected`, in order.
pub fn assert_source_order(status: &JobStatus, task_run_id: &str, expected: &[&str]) {
    let Some(task) = status.tasks.iter().find(|t| t.id == task_run_id) else {
        panic!("Task '{task_run_id}' is not present");
    };
    let actual: Vec<&str> = task.sources.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        actual, expected,
        "Expected source order {expected:?} for task '{task_run_id}', got {actual:?}"
    );
}

/// Asserts that the task ids of `status` are exactly `expected`, in order.
pub fn assert_task_order(status: &JobStatus, expected: &[&str]) {
    let actual: Vec<&str> = status.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(
        actual, expected,
        "Expected task order {expected:?}, got {actual:?}"
    );
}

/// Asserts that `filtered` is a projection of `full`.
///
/// Every task and source in `filtered` must exist in `full`, keep its
/// relative order, and carry identical stats, completion flags and
/// destinations (destinations in the same order).
pub fn assert_projection_of(filtered: &JobStatus, full: &JobStatus) {
    assert_eq!(filtered.id, full.id, "Projection changed the job run id");

    let mut last_task_idx = None;
    for task in &filtered.tasks {
        let idx = full.tasks.iter().position(|t| t.id == task.id);
        let Some(idx) = idx else {
            panic!("Task '{}' is not present in the unfiltered status", task.id);
        };
        assert!(
            last_task_idx.map_or(true, |last| idx > last),
            "Task '{}' is out of order",
            task.id
        );
        last_task_idx = Some(idx);

        let full_sources = &full.tasks[idx].sources;
        let mut last_source_idx = None;
        for source in &task.sources {
            let Some(source_idx) = full_sources.iter().position(|s| s.id == source.id) else {
                panic!(
                    "Source '{}' of task '{}' is not present in the unfiltered status",
                    source.id, task.id
                );
            };
            assert!(
                last_source_idx.map_or(true, |last| source_idx > last),
                "Source '{}' of task '{}' is out of order",
                source.id,
                task.id
            );
            last_source_idx = Some(source_idx);
            assert_eq!(
                source, &full_sources[source_idx],
                "Source '{}' of task '{}' differs from the unfiltered status",
                source.id, task.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::JobFilter;
    use crate::status::{JobTargetKey, Stats, StatusAggregator};
    use crate::testing::two_task_status;

    #[test]
    fn test_projection_of_filtered_tree() {
        let full = two_task_status("r");
        let filtered = full.clone().filtered(&JobFilter::new().with_task_run_ids(["t2"]));
        assert_projection_of(&filtered, &full);
        assert_task_order(&filtered, &["t2"]);
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_projection_rejects_reordering() {
        let full = two_task_status("r");
        let mut reordered = full.clone();
        reordered.tasks.reverse();
        assert_projection_of(&reordered, &full);
    }

    #[test]
    #[should_panic(expected = "Source 's2' of task 't1' is out of order")]
    fn test_projection_rejects_source_reordering() {
        let rows = [
            (JobTargetKey::source("t1", "s1"), Stats::new(1, 1, 0)),
            (JobTargetKey::source("t1", "s2"), Stats::new(1, 1, 0)),
            (JobTargetKey::source("t1", "s3"), Stats::new(1, 1, 0)),
        ];
        let full = StatusAggregator::assemble("r", rows.iter().map(|(k, s)| (k, s)));
        let mut reordered = full.clone();
        reordered.tasks[0].sources.swap(0, 2);
        assert_projection_of(&reordered, &full);
    }
}
