//! Dashboard aggregation over in-memory records
//!
//! The SQL store computes the same figures in SQL; both order ties the same
//! way so the two backends agree.

use std::collections::{HashMap, HashSet};

use shared_types::{
    AnalysisOverview, AnalysisRecord, DashboardStats, DashboardSummary, Impact, RecommendationRoi,
    ViolationTally,
};

pub const RECENT_ANALYSES: usize = 10;
pub const TOP_VIOLATIONS: usize = 5;
pub const TOP_RECOMMENDATIONS: usize = 5;

pub fn summarize(records: &[&AnalysisRecord]) -> DashboardSummary {
    DashboardSummary {
        stats: stats(records),
        analyses: recent_analyses(records),
        violations: top_violations(records),
        recommendations: top_recommendations(records),
    }
}

fn stats(records: &[&AnalysisRecord]) -> DashboardStats {
    let buildings: HashSet<&str> = records.iter().map(|r| r.video_id.as_str()).collect();

    let avg_compliance = if records.is_empty() {
        0.0
    } else {
        let total: f64 = records.iter().map(|r| r.scores.total).sum();
        (total / records.len() as f64).round()
    };

    DashboardStats {
        total_buildings: buildings.len() as u64,
        total_violations: records.iter().map(|r| r.markers.len() as u64).sum(),
        avg_compliance,
        high_priority_fixes: records
            .iter()
            .flat_map(|r| &r.recommendations)
            .filter(|rec| rec.impact == Impact::High)
            .count() as u64,
    }
}

fn recent_analyses(records: &[&AnalysisRecord]) -> Vec<AnalysisOverview> {
    let mut sorted: Vec<&AnalysisRecord> = records.to_vec();
    sorted.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.analysis_id.cmp(&a.analysis_id))
    });
    sorted
        .into_iter()
        .take(RECENT_ANALYSES)
        .map(AnalysisRecord::overview)
        .collect()
}

#[derive(Default)]
struct Tally<'a> {
    count: u64,
    confidence_sum: f64,
    analyses: HashSet<&'a str>,
}

fn top_violations(records: &[&AnalysisRecord]) -> Vec<ViolationTally> {
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for record in records {
        for marker in &record.markers {
            let tally = tallies.entry(marker.kind.as_str()).or_default();
            tally.count += 1;
            tally.confidence_sum += marker.confidence;
            tally.analyses.insert(record.analysis_id.as_str());
        }
    }

    let mut violations: Vec<ViolationTally> = tallies
        .into_iter()
        .map(|(kind, tally)| ViolationTally {
            kind: kind.to_string(),
            count: tally.count,
            avg_confidence: tally.confidence_sum / tally.count as f64,
            videos_affected: tally.analyses.len() as u64,
        })
        .collect();
    violations.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.kind.cmp(&b.kind)));
    violations.truncate(TOP_VIOLATIONS);
    violations
}

fn top_recommendations(records: &[&AnalysisRecord]) -> Vec<RecommendationRoi> {
    let mut recommendations: Vec<RecommendationRoi> = records
        .iter()
        .flat_map(|r| &r.recommendations)
        .map(|rec| RecommendationRoi::new(rec.title.clone(), rec.impact, rec.effort))
        .collect();
    recommendations.sort_by(|a, b| {
        b.net_benefit
            .cmp(&a.net_benefit)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.impact.as_str().cmp(b.impact.as_str()))
            .then_with(|| a.effort.as_str().cmp(b.effort.as_str()))
    });
    recommendations.truncate(TOP_RECOMMENDATIONS);
    recommendations
}
