//! End-to-end tests of the job-status routes over the in-memory store.

#[cfg(test)]
mod tests {
    use crate::errors::JobServiceError;
    use crate::filter::JobFilter;
    use crate::http::{router, AppState};
    use crate::memory::MemoryJobService;
    use crate::records::FailedRecords;
    use crate::service::JobService;
    use crate::status::{JobStatus, JobTargetKey, Stats};
    use crate::testing::{assert_projection_of, assert_task_order, raw_json, StatusBuilder};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn seeded_store() -> Arc<MemoryJobService> {
        let store = Arc::new(MemoryJobService::new());
        let one = Stats::new(1, 1, 0);
        for (task, dest) in [("t1", "d1"), ("t2", "d2")] {
            store.increment_stats("123", JobTargetKey::source(task, "s1"), one);
            store.increment_stats("123", JobTargetKey::new(task, "s1", dest), one);
        }
        store.increment_stats("123", JobTargetKey::source("t1", "s2"), Stats::new(4, 1, 1));
        store.increment_stats("123", JobTargetKey::new("t1", "s2", "d1"), Stats::new(2, 1, 1));
        store.add_failed_records(
            "123",
            &JobTargetKey::new("t1", "s2", "d1"),
            vec![raw_json(r#"{"id":"record_123"}"#)],
        );
        store
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_scenario_filter_returns_both_tasks() {
        let store = seeded_store();
        let app = router(AppState::new(store));

        let (status, body) = send(
            &app,
            Method::GET,
            "/v1/job-status/123?task_run_id=t1&task_run_id=t2&source_id=s1",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let one = Stats::new(1, 1, 0);
        let expected = StatusBuilder::new("123")
            .source("t1", "s1", true, one)
            .destination("d1", true, one)
            .source("t2", "s1", true, one)
            .destination("d2", true, one)
            .build();
        assert_eq!(body, serde_json::to_string(&expected).unwrap());
    }

    #[tokio::test]
    async fn test_unfiltered_status_contains_every_node_in_order() {
        let store = seeded_store();
        let app = router(AppState::new(store));

        let (status, body) = send(&app, Method::GET, "/v1/job-status/123").await;
        assert_eq!(status, StatusCode::OK);
        let tree: JobStatus = serde_json::from_str(&body).unwrap();
        assert_task_order(&tree, &["t1", "t2"]);

        let sources: Vec<_> = tree.tasks[0].sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(sources, vec!["s1", "s2"]);

        let s2 = tree.source("t1", "s2").unwrap();
        assert_eq!(s2.stats, Stats::new(4, 1, 1));
        assert!(!s2.completed);
    }

    #[tokio::test]
    async fn test_unknown_task_yields_empty_tasks() {
        let app = router(AppState::new(seeded_store()));

        let (status, body) = send(&app, Method::GET, "/v1/job-status/123?task_run_id=nope").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"id":"123","tasks":[]}"#);

        let (status, body) = send(
            &app,
            Method::GET,
            "/v1/job-status/123/failed-records?task_run_id=nope",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_missing_run_is_not_found_for_any_filter() {
        let app = router(AppState::new(seeded_store()));

        for query in ["", "?task_run_id=t1", "?source_id=s1", "?task_run_id=t1&source_id=s9"] {
            let (status, body) = send(&app, Method::GET, &format!("/v1/job-status/999{query}")).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "status query {query:?}");
            assert_eq!(body, "Status not found\n");

            let (status, body) = send(
                &app,
                Method::GET,
                &format!("/v1/job-status/999/failed-records{query}"),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND, "failed-records query {query:?}");
            assert_eq!(body, "Status not found\n");
        }
    }

    #[tokio::test]
    async fn test_failed_records_filtered_by_source() {
        let app = router(AppState::new(seeded_store()));

        let (status, body) = send(&app, Method::GET, "/v1/job-status/123/failed-records?source_id=s2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"[{"job_run_id":"123","task_run_id":"t1","source_id":"s2","destination_id":"d1","record_id":{"id":"record_123"}}]"#
        );

        let (status, body) = send(&app, Method::GET, "/v1/job-status/123/failed-records?source_id=s1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_delete_then_queries_are_not_found() {
        let store = seeded_store();
        let app = router(AppState::new(store.clone()));

        let (status, body) = send(&app, Method::DELETE, "/v1/job-status/123").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, "");

        let (status, _) = send(&app, Method::DELETE, "/v1/job-status/123").await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, "/v1/job-status/123").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::GET, "/v1/job-status/123/failed-records").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(store.run_count(), 0);
    }

    #[test]
    fn test_filtering_is_a_projection_for_every_filter() {
        let store = seeded_store();
        let full = tokio_test::block_on(store.get_status("123", &JobFilter::new())).unwrap();

        let tasks: [&[&str]; 4] = [&[], &["t1"], &["t2"], &["t1", "t2", "t9"]];
        let sources: [&[&str]; 4] = [&[], &["s1"], &["s2"], &["s9"]];
        for task_ids in tasks {
            for source_ids in sources {
                let filter = JobFilter::new()
                    .with_task_run_ids(task_ids.iter().copied())
                    .with_source_ids(source_ids.iter().copied());
                let filtered = tokio_test::block_on(store.get_status("123", &filter)).unwrap();
                assert_projection_of(&filtered, &full);

                for task in &filtered.tasks {
                    for source in &task.sources {
                        assert!(filter.includes(&task.id, &source.id));
                    }
                }
            }
        }
    }

    #[test]
    fn test_failed_records_never_found_for_missing_run() {
        let store = MemoryJobService::new();
        let result: Result<FailedRecords, JobServiceError> =
            tokio_test::block_on(store.get_failed_records("nope", &JobFilter::new()));
        assert_eq!(result, Err(JobServiceError::StatusNotFound));
    }
}
