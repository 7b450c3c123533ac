//! Stored analyses, markers, recommendations and the dashboard summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::types::{BoundingBox, Severity};

pub const DEFAULT_ANALYSIS_TITLE: &str = "ADA Compliance Analysis";

/// Per-category accessibility scores, 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    pub mobility: f64,
    pub vision: f64,
    pub hearing: f64,
    pub cognition: f64,
    pub total: f64,
}

/// Issue as sent back by a client when saving an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedIssue {
    /// Unset when the client sent no type or one we do not know
    #[serde(
        rename = "type",
        alias = "severity",
        default,
        deserialize_with = "lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Marker as sent back by a client when saving an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedMarker {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub ts_start_ms: Option<i64>,
    #[serde(default)]
    pub ts_end_ms: Option<i64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub text: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSubmission {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub scores: Option<Scores>,
    #[serde(default)]
    pub issues: Vec<SubmittedIssue>,
    #[serde(default)]
    pub markers: Vec<SubmittedMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub marker_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub ts_start_ms: i64,
    pub ts_end_ms: i64,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>, // [left, top, width, height]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Marker {
    /// Build a stored marker from a submitted one
    ///
    /// Explicit millisecond bounds win; otherwise the marker spans one second
    /// starting at `timestamp`.
    pub fn from_submission(marker: SubmittedMarker) -> Self {
        let start_from_ts = marker.timestamp.map(|t| (t * 1000.0).round() as i64);
        let ts_start_ms = marker.ts_start_ms.or(start_from_ts).unwrap_or(0);
        let ts_end_ms = marker
            .ts_end_ms
            .or(start_from_ts.map(|s| s + 1000))
            .unwrap_or(ts_start_ms + 1000);

        Self {
            marker_id: Uuid::new_v4().to_string(),
            kind: marker.kind,
            ts_start_ms,
            ts_end_ms,
            confidence: marker.confidence.unwrap_or(0.0),
            bbox: marker.bounding_box.map(|b| b.to_array()),
            text: marker.text,
            notes: marker.description.or(marker.notes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Estimated liability avoided by acting on a recommendation, in USD
    pub fn risk_mitigation_value(&self) -> i64 {
        match self {
            Impact::High => 50_000,
            Impact::Medium => 20_000,
            Impact::Low => 5_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }
}

impl std::str::FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Impact::High),
            "medium" => Ok(Impact::Medium),
            "low" => Ok(Impact::Low),
            other => Err(format!("unknown impact '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    High,
    Medium,
    Low,
}

impl Effort {
    /// Rough remediation cost estimate, in USD
    pub fn estimated_cost(&self) -> i64 {
        match self {
            Effort::Low => 1_000,
            Effort::Medium => 5_000,
            Effort::High => 20_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Effort::High => "high",
            Effort::Medium => "medium",
            Effort::Low => "low",
        }
    }
}

impl std::str::FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Effort::High),
            "medium" => Ok(Effort::Medium),
            "low" => Ok(Effort::Low),
            other => Err(format!("unknown effort '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub rec_id: String,
    pub title: String,
    pub impact: Impact,
    pub effort: Effort,
    pub policy: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub analysis_id: String,
    pub video_id: String,
    pub title: String,
    pub duration_s: f64,
    pub scores: Scores,
    pub markers: Vec<Marker>,
    pub recommendations: Vec<Recommendation>,
    pub issue_count: usize,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Fill defaults for everything the client left out
    ///
    /// Recommendations are derived elsewhere and passed in.
    pub fn from_submission(
        analysis_id: String,
        submission: AnalysisSubmission,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        Self {
            analysis_id,
            video_id: submission
                .video_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: submission
                .title
                .unwrap_or_else(|| DEFAULT_ANALYSIS_TITLE.to_string()),
            duration_s: submission.duration.unwrap_or(0.0),
            scores: submission.scores.unwrap_or_default(),
            issue_count: submission.issues.len(),
            markers: submission
                .markers
                .into_iter()
                .map(Marker::from_submission)
                .collect(),
            recommendations,
            created_at: Utc::now(),
        }
    }

    pub fn overview(&self) -> AnalysisOverview {
        AnalysisOverview {
            analysis_id: self.analysis_id.clone(),
            video_id: self.video_id.clone(),
            title: self.title.clone(),
            duration_s: self.duration_s,
            scores: self.scores,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOverview {
    pub analysis_id: String,
    pub video_id: String,
    pub title: String,
    pub duration_s: f64,
    pub scores: Scores,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_buildings: u64,
    pub total_violations: u64,
    pub avg_compliance: f64,
    pub high_priority_fixes: u64,
}

/// Marker counts grouped by marker type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationTally {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
    pub avg_confidence: f64,
    pub videos_affected: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRoi {
    pub title: String,
    pub impact: Impact,
    pub effort: Effort,
    pub estimated_cost: i64,
    pub risk_mitigation_value: i64,
    pub net_benefit: i64,
    pub roi_percentage: i64,
}

impl RecommendationRoi {
    pub fn new(title: String, impact: Impact, effort: Effort) -> Self {
        let estimated_cost = effort.estimated_cost();
        let risk_mitigation_value = impact.risk_mitigation_value();
        Self {
            title,
            impact,
            effort,
            estimated_cost,
            risk_mitigation_value,
            net_benefit: risk_mitigation_value - estimated_cost,
            roi_percentage: ((risk_mitigation_value as f64 / estimated_cost as f64) * 100.0)
                .round() as i64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub analyses: Vec<AnalysisOverview>,
    pub violations: Vec<ViolationTally>,
    pub recommendations: Vec<RecommendationRoi>,
}
