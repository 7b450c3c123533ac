//! Route tests for the Accessibilify server
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, backed
//! by the in-memory store and a canned label detector.
//!
//! Test categories:
//! - Frame analysis (labels, frame data, vision failures)
//! - Job result pages
//! - Live feed ordering and limits
//! - Stored analyses and the dashboard

#[cfg(test)]
mod route_tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use compliance_engine::{JobGrouping, LabelIngest};
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use shared_types::DetectedLabel;
    use tower::ServiceExt;

    use crate::build_router;
    use crate::state::AppState;
    use crate::store::{demo, InMemoryStore};
    use crate::vision::{LabelDetector, VisionError};

    /// Returns the same labels for every image
    struct CannedDetector(Vec<DetectedLabel>);

    #[async_trait]
    impl LabelDetector for CannedDetector {
        async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<DetectedLabel>, VisionError> {
            Ok(self.0.clone())
        }
    }

    struct UnavailableDetector;

    #[async_trait]
    impl LabelDetector for UnavailableDetector {
        async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<DetectedLabel>, VisionError> {
            Err(VisionError::Upstream {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    fn state_with(detector: Option<Arc<dyn LabelDetector>>, feed_capacity: usize) -> AppState {
        AppState::new(
            LabelIngest::new(JobGrouping::PerLabel),
            Arc::new(InMemoryStore::new()),
            detector,
            feed_capacity,
        )
    }

    fn app() -> Router {
        build_router(state_with(None, 100))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn titles(issues: &Value) -> Vec<String> {
        issues
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "accessibilify-server");
    }

    #[tokio::test]
    async fn test_list_rules() {
        let (status, body) = send(app(), Method::GET, "/api/rules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 46);

        let stairs = body["rules"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["id"] == "missing_handrail")
            .unwrap();
        assert_eq!(stairs["policyReference"], "ADA 505.2");
        assert_eq!(stairs["severity"], "error");
        assert!(stairs["condition"].as_str().unwrap().contains("handrail"));
    }

    #[tokio::test]
    async fn test_analyze_frame_with_labels() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/analyze/frame",
            Some(json!({
                "timestamp": 12.5,
                "labels": [{"Name": "Stairs", "Confidence": 80.0}]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["timestamp"], 12.5);
        assert_eq!(body["observations"].as_array().unwrap().len(), 1);

        let errors: Vec<&Value> = body["accessibilityIssues"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|i| i["severity"] == "error")
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["title"], "Missing Handrail");
        assert_eq!(errors[0]["policyReference"], "ADA 505.2");
        assert_eq!(errors[0]["timestamp"], 12.5);
    }

    #[tokio::test]
    async fn test_analyze_frame_requires_input() {
        let (status, body) =
            send(app(), Method::POST, "/api/analyze/frame", Some(json!({"timestamp": 1.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": "No frame data provided", "code": "INVALID_REQUEST"})
        );
    }

    #[tokio::test]
    async fn test_frame_data_without_vision_client() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/analyze/frame",
            Some(json!({"timestamp": 1.0, "frameData": "aGVsbG8="})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_frame_data_uses_detector() {
        let detector = CannedDetector(vec![
            DetectedLabel::new("Door", 90.0),
            DetectedLabel::new("Glass", 85.0),
        ]);
        let app = build_router(state_with(Some(Arc::new(detector)), 100));

        let (status, body) = send(
            app,
            Method::POST,
            "/api/analyze/frame",
            Some(json!({"timestamp": 3.0, "frameData": "data:image/jpeg;base64,aGVsbG8="})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["labels"].as_array().unwrap().len(), 2);
        let titles = titles(&body["accessibilityIssues"]);
        assert!(titles.contains(&"Glass Door Visibility".to_string()));
        assert!(!titles.contains(&"Verify Door Width".to_string()));
    }

    #[tokio::test]
    async fn test_frame_data_must_be_base64() {
        let app = build_router(state_with(Some(Arc::new(CannedDetector(vec![]))), 100));
        let (status, body) = send(
            app,
            Method::POST,
            "/api/analyze/frame",
            Some(json!({"frameData": "not base64!"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_vision_failure_is_bad_gateway() {
        let app = build_router(state_with(Some(Arc::new(UnavailableDetector)), 100));
        let (status, body) = send(
            app,
            Method::POST,
            "/api/analyze/frame",
            Some(json!({"frameData": "aGVsbG8="})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "VISION_SERVICE_ERROR");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_job_results_in_progress() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/analyze/job-results",
            Some(json!({"JobStatus": "IN_PROGRESS", "StatusMessage": "42%"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "processing", "progress": "42%"}));
    }

    #[tokio::test]
    async fn test_job_results_completed() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/analyze/job-results",
            Some(json!({
                "JobStatus": "SUCCEEDED",
                "VideoMetadata": {"DurationMillis": 60000},
                "Labels": [
                    {"Timestamp": 2500, "Label": {"Name": "Stairs", "Confidence": 80.0}},
                    {"Timestamp": 2500},
                    {"Timestamp": 4000, "Label": {"Name": "Tree", "Confidence": 60.0}}
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");
        assert_eq!(body["labels"].as_array().unwrap().len(), 3);
        assert_eq!(body["observations"].as_array().unwrap().len(), 2);
        assert_eq!(body["videoMetadata"]["DurationMillis"], 60000);

        let handrail = body["accessibilityIssues"]
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["title"] == "Missing Handrail")
            .unwrap();
        assert_eq!(handrail["timestamp"], 2.5);
    }

    #[tokio::test]
    async fn test_job_results_failed() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/analyze/job-results",
            Some(json!({"JobStatus": "FAILED"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "FAILED", "error": "Label detection job failed"})
        );

        let (_, body) = send(
            app(),
            Method::POST,
            "/api/analyze/job-results",
            Some(json!({"JobStatus": "FAILED", "StatusMessage": "Video too long"})),
        )
        .await;
        assert_eq!(body["error"], "Video too long");
    }

    #[tokio::test]
    async fn test_feed_newest_first_with_limit() {
        let app = build_router(state_with(None, 100));

        for (timestamp, name) in [(1.0, "Stairs"), (2.0, "Wheelchair")] {
            let (status, _) = send(
                app.clone(),
                Method::POST,
                "/api/analyze/frame",
                Some(json!({"timestamp": timestamp, "labels": [{"Name": name, "Confidence": 80.0}]})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(app.clone(), Method::GET, "/api/feed", None).await;
        assert_eq!(status, StatusCode::OK);
        let issues = body["issues"].as_array().unwrap();
        assert!(issues.len() >= 2);
        assert_eq!(body["count"], issues.len());
        assert_eq!(issues[0]["timestamp"], 2.0);
        assert_eq!(issues.last().unwrap()["timestamp"], 1.0);

        let (_, body) = send(app, Method::GET, "/api/feed?limit=1", None).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["issues"][0]["timestamp"], 2.0);
    }

    #[tokio::test]
    async fn test_feed_is_bounded() {
        let app = build_router(state_with(None, 1));
        send(
            app.clone(),
            Method::POST,
            "/api/analyze/frame",
            Some(json!({"labels": [{"Name": "Chair", "Confidence": 90.0}]})),
        )
        .await;

        let (_, body) = send(app, Method::GET, "/api/feed", None).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_store_and_fetch_analysis() {
        let app = app();
        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/analysis",
            Some(json!({
                "videoId": "entrance-video-1",
                "title": "Main Entrance",
                "duration": 120.0,
                "scores": {"mobility": 65, "vision": 78, "hearing": 90, "cognition": 85, "total": 79},
                "issues": [
                    {"type": "error", "title": "Missing Handrail"},
                    {"type": "success", "title": "Good Lighting"}
                ],
                "markers": [
                    {"type": "missing_handrail", "timestamp": 15.0, "confidence": 0.92}
                ]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let analysis_id = body["analysisId"].as_str().unwrap().to_string();

        let (status, body) =
            send(app, Method::GET, &format!("/api/analysis/{}", analysis_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let analysis = &body["analysis"];
        assert_eq!(analysis["analysisId"], analysis_id.as_str());
        assert_eq!(analysis["title"], "Main Entrance");
        assert_eq!(analysis["issueCount"], 2);
        assert_eq!(analysis["markers"][0]["tsStartMs"], 15000);
        assert_eq!(analysis["markers"][0]["tsEndMs"], 16000);

        let recommendation_titles: Vec<&str> = analysis["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(
            recommendation_titles,
            vec!["Address Critical ADA Violations", "Install or Repair Handrails on Stairs"]
        );
    }

    #[tokio::test]
    async fn test_store_analysis_accepts_loose_parts() {
        let bodies = [
            json!({"issues": [{"title": "Missing Handrail"}]}),
            json!({"issues": [{"type": "critical", "title": "Poor Lighting"}]}),
            json!({"markers": [{"timestamp": 1.0, "confidence": 80}]}),
        ];

        for body in bodies {
            let app = app();
            let (status, stored) =
                send(app.clone(), Method::POST, "/api/analysis", Some(body)).await;
            assert_eq!(status, StatusCode::OK);

            let uri = format!("/api/analysis/{}", stored["analysisId"].as_str().unwrap());
            let (status, fetched) = send(app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::OK);

            let titles: Vec<&str> = fetched["analysis"]["recommendations"]
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r["title"].as_str().unwrap())
                .collect();
            assert!(!titles.contains(&"Address Critical ADA Violations"));
        }
    }

    #[tokio::test]
    async fn test_missing_analysis_is_not_found() {
        let (status, body) = send(app(), Method::GET, "/api/analysis/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ANALYSIS_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let (status, body) = send(app(), Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["stats"]["totalBuildings"], 0);
        assert_eq!(body["analyses"], json!([]));
        assert_eq!(body["violations"], json!([]));
        assert_eq!(body["recommendations"], json!([]));
    }

    #[tokio::test]
    async fn test_seeded_dashboard() {
        let state = state_with(None, 100);
        demo::seed(state.store.as_ref()).await.unwrap();

        let (status, body) = send(build_router(state), Method::GET, "/api/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["stats"],
            json!({
                "totalBuildings": 8,
                "totalViolations": 11,
                "avgCompliance": 80.0,
                "highPriorityFixes": 7
            })
        );
        assert_eq!(body["analyses"][0]["analysisId"], "demo-008");
        assert_eq!(body["violations"].as_array().unwrap().len(), 5);
        assert_eq!(body["recommendations"][0]["netBenefit"], 49000);
        assert_eq!(body["recommendations"][0]["roiPercentage"], 5000);
    }

    #[tokio::test]
    async fn test_init_storage() {
        let (status, body) = send(app(), Method::POST, "/api/storage/init", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use compliance_engine::ingest::{JobStatus, LabelDetectionPage};
    use compliance_engine::LabelIngest;

    use crate::api::JobResultsResponse;

    /// Job statuses the vision service might report besides the known ones
    fn unknown_status() -> impl Strategy<Value = String> {
        "[A-Z_]{1,16}".prop_filter("Must not be a known status", |s| {
            !matches!(s.as_str(), "IN_PROGRESS" | "SUCCEEDED")
        })
    }

    proptest! {
        /// Property: anything but IN_PROGRESS or SUCCEEDED is echoed with an error
        #[test]
        fn unknown_status_reports_error(status in unknown_status()) {
            let page = LabelDetectionPage {
                job_status: JobStatus::from(status.clone()),
                ..Default::default()
            };
            let response = JobResultsResponse::from(LabelIngest::default().analyze_job_page(&page));

            prop_assert_eq!(response.status, status);
            prop_assert!(response.error.is_some());
            prop_assert!(response.accessibility_issues.is_none());
        }

        /// Property: the progress message is passed through untouched
        #[test]
        fn progress_passed_through(message in ".{0,40}") {
            let page = LabelDetectionPage {
                job_status: JobStatus::InProgress,
                status_message: Some(message.clone()),
                ..Default::default()
            };
            let response = JobResultsResponse::from(LabelIngest::default().analyze_job_page(&page));

            prop_assert_eq!(response.status, "processing");
            prop_assert_eq!(response.progress, Some(message));
        }
    }
}
