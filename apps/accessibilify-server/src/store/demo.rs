//! Demo analyses for `--seed-demo`

use chrono::{Duration, Utc};
use shared_types::{AnalysisRecord, Effort, Impact, Marker, Recommendation, Scores};

use super::{AnalysisStore, StoreResult};

// (id, video, title, duration, mobility, vision, hearing, cognition, total)
type DemoAnalysis = (&'static str, &'static str, &'static str, f64, f64, f64, f64, f64, f64);

// (analysis, marker, type, start ms, end ms, confidence, bbox, notes)
type DemoMarker = (
    &'static str,
    &'static str,
    &'static str,
    i64,
    i64,
    f64,
    Option<[f64; 4]>,
    &'static str,
);

// (analysis, rec, title, impact, effort, policy, rationale)
type DemoRecommendation = (
    &'static str,
    &'static str,
    &'static str,
    Impact,
    Effort,
    &'static str,
    &'static str,
);

const ANALYSES: &[DemoAnalysis] = &[
    ("demo-001", "entrance-video-1", "Main Entrance Analysis", 120.0, 65.0, 78.0, 90.0, 85.0, 79.0),
    ("demo-002", "lobby-video-2", "Lobby Accessibility Check", 90.0, 45.0, 82.0, 88.0, 90.0, 76.0),
    ("demo-003", "stairwell-video-3", "Stairwell Compliance Review", 150.0, 35.0, 70.0, 85.0, 80.0, 67.0),
    ("demo-004", "parking-video-4", "Parking Area Assessment", 180.0, 72.0, 85.0, 92.0, 88.0, 84.0),
    ("demo-005", "elevator-video-5", "Elevator Accessibility Audit", 60.0, 90.0, 95.0, 88.0, 92.0, 91.0),
    ("demo-006", "restroom-video-6", "Restroom ADA Compliance", 100.0, 55.0, 75.0, 80.0, 78.0, 72.0),
    ("demo-007", "ramp-video-7", "Wheelchair Ramp Analysis", 45.0, 85.0, 90.0, 95.0, 90.0, 90.0),
    ("demo-008", "signage-video-8", "Signage and Wayfinding Review", 75.0, 70.0, 60.0, 85.0, 95.0, 77.0),
];

const MARKERS: &[DemoMarker] = &[
    ("demo-001", "mark-001", "missing_handrail", 15_000, 18_000, 0.92, Some([0.3, 0.4, 0.2, 0.3]), "Stairs without handrails detected"),
    ("demo-001", "mark-002", "narrow_doorway", 45_000, 47_000, 0.85, Some([0.5, 0.2, 0.15, 0.6]), "Door width below 32 inches"),
    ("demo-002", "mark-003", "poor_lighting", 10_000, 15_000, 0.78, None, "Insufficient lighting in hallway"),
    ("demo-002", "mark-004", "obstacle_in_path", 30_000, 32_000, 0.88, Some([0.4, 0.5, 0.1, 0.2]), "Furniture blocking accessible route"),
    ("demo-003", "mark-005", "no_ramp", 5_000, 8_000, 0.95, Some([0.1, 0.7, 0.3, 0.2]), "No wheelchair ramp available"),
    ("demo-003", "mark-006", "steep_slope", 25_000, 28_000, 0.82, Some([0.2, 0.6, 0.4, 0.3]), "Ramp gradient exceeds 1:12 ratio"),
    ("demo-004", "mark-007", "no_accessible_parking", 0, 5_000, 0.91, Some([0.0, 0.0, 1.0, 0.5]), "No designated accessible parking spaces"),
    ("demo-005", "mark-008", "elevator_controls_high", 15_000, 17_000, 0.76, Some([0.7, 0.3, 0.1, 0.3]), "Call buttons above 48 inch height"),
    ("demo-006", "mark-009", "door_hardware", 20_000, 22_000, 0.83, Some([0.6, 0.4, 0.05, 0.15]), "Non-compliant door handles"),
    ("demo-007", "mark-010", "missing_edge_protection", 10_000, 12_000, 0.89, Some([0.15, 0.8, 0.7, 0.1]), "Ramp lacks edge protection"),
    ("demo-008", "mark-011", "no_braille", 5_000, 7_000, 0.94, Some([0.55, 0.25, 0.2, 0.3]), "Signage missing Braille text"),
];

const RECOMMENDATIONS: &[DemoRecommendation] = &[
    ("demo-001", "rec-001", "Install handrails on both sides of stairs", Impact::High, Effort::Low, "ADA 505.2", "Required for safe navigation"),
    ("demo-001", "rec-002", "Widen doorway to 32 inch minimum", Impact::High, Effort::High, "ADA 404.2.3", "Essential for wheelchair access"),
    ("demo-002", "rec-003", "Upgrade lighting to meet standards", Impact::Medium, Effort::Low, "ANSI A117.1", "Improves visibility and safety"),
    ("demo-002", "rec-004", "Relocate furniture from pathway", Impact::High, Effort::Low, "ADA 403.5", "Clear 36 inch pathway required"),
    ("demo-003", "rec-005", "Install wheelchair ramp with proper slope", Impact::High, Effort::Medium, "ADA 405.2", "Provides accessible route"),
    ("demo-004", "rec-006", "Create accessible parking spaces", Impact::High, Effort::Medium, "ADA 502", "Required by law for parking facilities"),
    ("demo-005", "rec-007", "Lower elevator controls", Impact::Medium, Effort::Low, "ADA 407.4.6", "Controls must be 15-48 inches high"),
    ("demo-006", "rec-008", "Install lever handles on doors", Impact::Medium, Effort::Low, "ADA 404.2.7", "Easier operation for all users"),
    ("demo-007", "rec-009", "Add edge protection to ramp", Impact::High, Effort::Low, "ADA 405.9", "Prevents wheelchairs from slipping off"),
    ("demo-008", "rec-010", "Add Braille to all signage", Impact::High, Effort::Low, "ADA 703.2", "Required for vision accessibility"),
];

/// The demo analyses with their markers and recommendations
///
/// `created_at` is staggered one minute apart so `demo-008` is the newest.
pub fn demo_records() -> Vec<AnalysisRecord> {
    let now = Utc::now();
    let count = ANALYSES.len() as i64;

    ANALYSES
        .iter()
        .enumerate()
        .map(|(i, &(id, video, title, duration, mobility, vision, hearing, cognition, total))| {
            let markers: Vec<Marker> = MARKERS
                .iter()
                .filter(|m| m.0 == id)
                .map(|&(_, marker_id, kind, start, end, confidence, bbox, notes)| Marker {
                    marker_id: marker_id.to_string(),
                    kind: kind.to_string(),
                    ts_start_ms: start,
                    ts_end_ms: end,
                    confidence,
                    bbox,
                    text: None,
                    notes: Some(notes.to_string()),
                })
                .collect();

            AnalysisRecord {
                analysis_id: id.to_string(),
                video_id: video.to_string(),
                title: title.to_string(),
                duration_s: duration,
                scores: Scores {
                    mobility,
                    vision,
                    hearing,
                    cognition,
                    total,
                },
                recommendations: RECOMMENDATIONS
                    .iter()
                    .filter(|r| r.0 == id)
                    .map(
                        |&(_, rec_id, title, impact, effort, policy, rationale)| Recommendation {
                            rec_id: rec_id.to_string(),
                            title: title.to_string(),
                            impact,
                            effort,
                            policy: policy.to_string(),
                            rationale: rationale.to_string(),
                        },
                    )
                    .collect(),
                issue_count: markers.len(),
                markers,
                created_at: now - Duration::minutes(count - i as i64),
            }
        })
        .collect()
}

/// Store every demo analysis, replacing earlier copies
pub async fn seed(store: &dyn AnalysisStore) -> StoreResult<usize> {
    let records = demo_records();
    for record in &records {
        store.store_analysis(record).await?;
    }
    tracing::info!(
        "Seeded {} demo analyses ({} markers, {} recommendations)",
        records.len(),
        MARKERS.len(),
        RECOMMENDATIONS.len()
    );
    Ok(records.len())
}
