pub mod analysis;
pub mod types;

pub use analysis::{
    AnalysisOverview, AnalysisRecord, AnalysisSubmission, DashboardStats, DashboardSummary,
    Effort, Impact, Marker, Recommendation, RecommendationRoi, Scores, SubmittedIssue,
    SubmittedMarker, ViolationTally,
};
pub use types::{
    BoundingBox, DetectedLabel, FrameAnalysis, Instance, Issue, Observation, ParentLabel,
    Severity,
};
