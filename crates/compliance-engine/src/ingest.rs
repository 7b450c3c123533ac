//! Label ingest: turn detection payloads into classifier invocations
//!
//! Two payload shapes arrive here. A [`FrameDetection`] is one sampled frame
//! and is always classified as a whole, so cross-label rules (handrail next to
//! stairs, glass next to a door) see every sibling label.
//!
//! A [`LabelDetectionPage`] is one page of an asynchronous video job. Under
//! [`JobGrouping::PerLabel`] every `{Timestamp, Label}` item is classified on
//! its own and cross-label rules never see siblings: stairs and a handrail at
//! the same timestamp still yield "Missing Handrail". [`JobGrouping::PerTimestamp`]
//! buckets items sharing a timestamp into one invocation instead.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared_types::{DetectedLabel, FrameAnalysis};
use tracing::debug;

use crate::ComplianceEngine;

/// Labels detected in a single sampled frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetection {
    /// Seconds into the video
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub labels: Vec<DetectedLabel>,
}

/// One `{Timestamp, Label}` item from a job result page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimestampedLabel {
    /// Milliseconds into the video
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub label: Option<DetectedLabel>,
}

impl TimestampedLabel {
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp.unwrap_or(0.0)
    }

    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ms() / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
    /// Anything the vision service reports that we do not know about
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Other(status) => status,
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Other(String::new())
    }
}

impl From<String> for JobStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "IN_PROGRESS" => JobStatus::InProgress,
            "SUCCEEDED" => JobStatus::Succeeded,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::Other(status),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a video label-detection job, as the vision service returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabelDetectionPage {
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub labels: Vec<TimestampedLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// How job result items are bucketed into classifier invocations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobGrouping {
    /// One invocation per item; cross-label rules see only that label
    #[default]
    PerLabel,
    /// One invocation per distinct timestamp, in first-appearance order
    PerTimestamp,
}

impl FromStr for JobGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "per-label" => Ok(JobGrouping::PerLabel),
            "per-timestamp" => Ok(JobGrouping::PerTimestamp),
            other => Err(format!(
                "unknown job grouping '{}' (expected per-label or per-timestamp)",
                other
            )),
        }
    }
}

impl fmt::Display for JobGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobGrouping::PerLabel => f.write_str("per-label"),
            JobGrouping::PerTimestamp => f.write_str("per-timestamp"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Processing {
        progress: Option<String>,
    },
    Completed {
        labels: Vec<TimestampedLabel>,
        analysis: FrameAnalysis,
        video_metadata: Option<serde_json::Value>,
    },
    Failed {
        status: String,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabelIngest {
    engine: ComplianceEngine,
    grouping: JobGrouping,
}

impl LabelIngest {
    pub fn new(grouping: JobGrouping) -> Self {
        Self {
            engine: ComplianceEngine::new(),
            grouping,
        }
    }

    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    pub fn grouping(&self) -> JobGrouping {
        self.grouping
    }

    pub fn analyze_frame(&self, frame: &FrameDetection) -> FrameAnalysis {
        let with_boxes = frame
            .labels
            .iter()
            .filter(|l| l.has_bounding_box())
            .count();
        debug!(
            labels = frame.labels.len(),
            with_boxes,
            timestamp = frame.timestamp,
            "Analyzing frame"
        );

        let analysis = self.engine.classify(&frame.labels, frame.timestamp);
        debug!(
            issues = analysis.issues.len(),
            observations = analysis.observations.len(),
            "Frame analyzed"
        );
        analysis
    }

    pub fn analyze_job_page(&self, page: &LabelDetectionPage) -> JobOutcome {
        match page.job_status {
            JobStatus::InProgress => JobOutcome::Processing {
                progress: page.status_message.clone(),
            },
            JobStatus::Succeeded => {
                let analysis = self.classify_job_items(&page.labels);
                debug!(
                    items = page.labels.len(),
                    issues = analysis.issues.len(),
                    grouping = %self.grouping,
                    "Job page analyzed"
                );
                JobOutcome::Completed {
                    labels: page.labels.clone(),
                    analysis,
                    video_metadata: page.video_metadata.clone(),
                }
            }
            ref status => JobOutcome::Failed {
                status: status.to_string(),
                message: page.status_message.clone(),
            },
        }
    }

    fn classify_job_items(&self, items: &[TimestampedLabel]) -> FrameAnalysis {
        let mut analysis = FrameAnalysis::default();

        match self.grouping {
            JobGrouping::PerLabel => {
                for item in items {
                    // An item without a label is an empty invocation
                    if let Some(label) = &item.label {
                        analysis.extend(
                            self.engine
                                .classify(std::slice::from_ref(label), item.timestamp_secs()),
                        );
                    }
                }
            }
            JobGrouping::PerTimestamp => {
                for (timestamp, labels) in bucket_by_timestamp(items) {
                    analysis.extend(self.engine.classify(&labels, timestamp));
                }
            }
        }

        analysis
    }
}

/// Group labelled items by timestamp, keeping first-appearance order
fn bucket_by_timestamp(items: &[TimestampedLabel]) -> Vec<(f64, Vec<DetectedLabel>)> {
    let mut buckets: Vec<(f64, Vec<DetectedLabel>)> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for item in items {
        let Some(label) = &item.label else {
            continue;
        };
        let secs = item.timestamp_secs();
        let slot = *index.entry(secs.to_bits()).or_insert_with(|| {
            buckets.push((secs, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(label.clone());
    }

    buckets
}
