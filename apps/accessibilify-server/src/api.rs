//! API handlers for the Accessibilify server
//!
//! Provides REST endpoints for:
//! - Frame and job-result analysis
//! - The live issue feed
//! - Stored analyses and the dashboard

use axum::{
    extract::{Path, Query, State},
    Json,
};
use compliance_engine::ingest::{FrameDetection, LabelDetectionPage, TimestampedLabel};
use compliance_engine::{recommendations, Condition, JobOutcome, Rule};
use serde::{Deserialize, Serialize};
use shared_types::{
    AnalysisRecord, AnalysisSubmission, DashboardSummary, DetectedLabel, Issue, Observation,
    Severity,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::AppState;
use crate::vision::decode_frame_data;

const JOB_FAILED_MESSAGE: &str = "Label detection job failed";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "accessibilify-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Rule list response
#[derive(Serialize)]
pub struct RuleListResponse {
    pub success: bool,
    pub rules: Vec<RuleInfo>,
    pub count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: &'static str,
    pub keywords: &'static [&'static str],
    pub severity: Severity,
    pub title: &'static str,
    pub policy_reference: &'static str,
    pub confidence_boost: f64,
    pub condition: String,
}

impl From<&Rule> for RuleInfo {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id,
            keywords: rule.keywords,
            severity: rule.severity,
            title: rule.title,
            policy_reference: rule.policy_reference,
            confidence_boost: rule.confidence_boost,
            condition: describe_condition(&rule.condition),
        }
    }
}

fn describe_condition(condition: &Condition) -> String {
    match condition {
        Condition::Always => "always".to_string(),
        Condition::NameAlsoContains(keywords) => {
            format!("label name also contains one of: {}", keywords.join(", "))
        }
        Condition::FrameContains(keywords) => {
            format!("frame has a label containing one of: {}", keywords.join(", "))
        }
        Condition::FrameLacks(keywords) => {
            format!("frame has no label containing any of: {}", keywords.join(", "))
        }
        Condition::MoreInstancesThan(n) => format!("more than {} instances", n),
    }
}

/// Handler: GET /api/rules
pub async fn handle_list_rules(State(state): State<AppState>) -> Json<RuleListResponse> {
    let rules: Vec<RuleInfo> = state
        .ingest
        .engine()
        .rules()
        .iter()
        .map(RuleInfo::from)
        .collect();
    let count = rules.len();

    Json(RuleListResponse {
        success: true,
        rules,
        count,
    })
}

/// Frame analysis request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    /// Seconds into the video
    #[serde(default)]
    pub timestamp: f64,

    /// Labels already detected by the caller
    #[serde(default)]
    pub labels: Option<Vec<DetectedLabel>>,

    /// Base64 image, optionally as a `data:image/...;base64,` URL
    #[serde(default)]
    pub frame_data: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResponse {
    pub success: bool,
    pub timestamp: f64,
    pub labels: Vec<DetectedLabel>,
    pub accessibility_issues: Vec<Issue>,
    pub observations: Vec<Observation>,
}

/// Handler: POST /api/analyze/frame
pub async fn handle_analyze_frame(
    State(state): State<AppState>,
    Json(request): Json<FrameRequest>,
) -> Result<Json<FrameResponse>, ServerError> {
    let labels = match (request.labels, request.frame_data) {
        (Some(labels), _) => labels,
        (None, Some(frame_data)) => {
            let detector = state.detector.as_ref().ok_or_else(|| {
                ServerError::InvalidRequest("Vision service not configured".to_string())
            })?;
            let image = decode_frame_data(&frame_data)?;
            debug!(bytes = image.len(), "Detecting labels for frame");
            detector.detect_labels(&image).await?
        }
        (None, None) => {
            return Err(ServerError::InvalidRequest(
                "No frame data provided".to_string(),
            ))
        }
    };

    let frame = FrameDetection {
        timestamp: request.timestamp,
        labels,
    };
    let analysis = state.ingest.analyze_frame(&frame);

    state.feed().extend(analysis.issues.iter().cloned());

    Ok(Json(FrameResponse {
        success: true,
        timestamp: frame.timestamp,
        labels: frame.labels,
        accessibility_issues: analysis.issues,
        observations: analysis.observations,
    }))
}

/// Job results response; which fields are present depends on `status`
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResultsResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<TimestampedLabel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_issues: Option<Vec<Issue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<Vec<Observation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<JobOutcome> for JobResultsResponse {
    fn from(outcome: JobOutcome) -> Self {
        match outcome {
            JobOutcome::Processing { progress } => Self {
                status: "processing".to_string(),
                progress,
                ..Default::default()
            },
            JobOutcome::Completed {
                labels,
                analysis,
                video_metadata,
            } => Self {
                status: "completed".to_string(),
                labels: Some(labels),
                accessibility_issues: Some(analysis.issues),
                observations: Some(analysis.observations),
                video_metadata,
                ..Default::default()
            },
            JobOutcome::Failed { status, message } => Self {
                status,
                error: Some(message.unwrap_or_else(|| JOB_FAILED_MESSAGE.to_string())),
                ..Default::default()
            },
        }
    }
}

/// Handler: POST /api/analyze/job-results
pub async fn handle_job_results(
    State(state): State<AppState>,
    Json(page): Json<LabelDetectionPage>,
) -> Json<JobResultsResponse> {
    Json(state.ingest.analyze_job_page(&page).into())
}

#[derive(Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub success: bool,
    pub issues: Vec<Issue>,
    pub count: usize,
}

/// Handler: GET /api/feed
pub async fn handle_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let issues = {
        let feed = state.feed();
        feed.latest(query.limit.unwrap_or(feed.len()))
    };
    let count = issues.len();

    Json(FeedResponse {
        success: true,
        issues,
        count,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAnalysisResponse {
    pub success: bool,
    pub analysis_id: String,
    pub message: String,
}

/// Handler: POST /api/analysis
pub async fn handle_store_analysis(
    State(state): State<AppState>,
    Json(submission): Json<AnalysisSubmission>,
) -> Result<Json<StoreAnalysisResponse>, ServerError> {
    let analysis_id = Uuid::new_v4().to_string();
    let recommendations =
        recommendations::from_submitted(&submission.issues, || Uuid::new_v4().to_string());
    let record = AnalysisRecord::from_submission(analysis_id.clone(), submission, recommendations);

    state.store.store_analysis(&record).await?;
    info!(
        analysis_id = %analysis_id,
        markers = record.markers.len(),
        recommendations = record.recommendations.len(),
        "Analysis stored"
    );

    Ok(Json(StoreAnalysisResponse {
        success: true,
        analysis_id,
        message: "Analysis stored successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub analysis: AnalysisRecord,
}

/// Handler: GET /api/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<Json<AnalysisResponse>, ServerError> {
    let analysis = state
        .store
        .get_analysis(&analysis_id)
        .await?
        .ok_or(ServerError::AnalysisNotFound(analysis_id))?;

    Ok(Json(AnalysisResponse {
        success: true,
        analysis,
    }))
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

/// Handler: GET /api/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let summary = state.store.dashboard().await?;
    debug!(
        analyses = summary.analyses.len(),
        violations = summary.violations.len(),
        "Dashboard computed"
    );

    Ok(Json(DashboardResponse {
        success: true,
        summary,
    }))
}

#[derive(Serialize)]
pub struct InitStorageResponse {
    pub success: bool,
    pub message: String,
}

/// Handler: POST /api/storage/init
pub async fn handle_init_storage(
    State(state): State<AppState>,
) -> Result<Json<InitStorageResponse>, ServerError> {
    state.store.initialize().await?;
    info!("Storage initialized ({})", state.store.backend());

    Ok(Json(InitStorageResponse {
        success: true,
        message: format!("Storage initialized ({})", state.store.backend()),
    }))
}
