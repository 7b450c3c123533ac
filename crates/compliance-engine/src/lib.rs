pub mod feed;
pub mod ingest;
pub mod observations;
pub mod patterns;
pub mod recommendations;
pub mod rules;

use rand::Rng;
use shared_types::{DetectedLabel, FrameAnalysis};

pub use feed::IssueFeed;
pub use ingest::{JobGrouping, JobOutcome, LabelIngest};
pub use rules::{Condition, Description, Rule, RULES};

/// ComplianceEngine entry point
///
/// Stateless: one engine can classify any number of frames concurrently.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceEngine {
    rules: &'static [Rule],
}

impl ComplianceEngine {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    /// Engine over a custom rule table (tests, experiments)
    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Classify every label detected in one frame (or one job bucket)
    ///
    /// Returns one observation per label in input order, and every issue any
    /// rule produced, grouped by label and in catalog order within a label.
    pub fn classify(&self, labels: &[DetectedLabel], timestamp: f64) -> FrameAnalysis {
        self.classify_with_rng(labels, timestamp, &mut rand::thread_rng())
    }

    /// Same as [`classify`](Self::classify) with a caller-supplied source for
    /// placeholder coordinates
    pub fn classify_with_rng<R: Rng + ?Sized>(
        &self,
        labels: &[DetectedLabel],
        timestamp: f64,
        rng: &mut R,
    ) -> FrameAnalysis {
        let frame_names = patterns::lowered_names(labels.iter().map(DetectedLabel::name));
        let mut analysis = FrameAnalysis::default();

        for (label, name) in labels.iter().zip(&frame_names) {
            analysis
                .observations
                .push(observations::observe(label, timestamp, rng));

            analysis.issues.extend(
                self.rules
                    .iter()
                    .filter_map(|rule| rule.evaluate(label, name, &frame_names, timestamp)),
            );
        }

        analysis
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the built-in catalog
pub fn classify(labels: &[DetectedLabel], timestamp: f64) -> FrameAnalysis {
    ComplianceEngine::new().classify(labels, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{BoundingBox, Instance, Issue, Severity};

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    fn person_with(instances: usize) -> DetectedLabel {
        let mut label = DetectedLabel::new("Person", 99.0);
        label.instances = (0..instances)
            .map(|i| Instance {
                bounding_box: Some(BoundingBox {
                    left: 0.1 * i as f64,
                    top: 0.1,
                    width: 0.05,
                    height: 0.3,
                }),
                confidence: Some(98.0),
            })
            .collect();
        label
    }

    #[test]
    fn test_stairs_alone_missing_handrail() {
        let result = classify(&[DetectedLabel::new("Stairs", 80.0)], 4.0);

        let errors: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title, "Missing Handrail");
        assert_eq!(errors[0].policy_reference, "ADA 505.2");
        assert_eq!(errors[0].confidence, 80.0);
        assert_eq!(errors[0].timestamp, 4.0);
    }

    #[test]
    fn test_handrail_suppresses_missing_handrail() {
        let labels = [
            DetectedLabel::new("Stairs", 80.0),
            DetectedLabel::new("Handrail", 90.0),
        ];
        let result = classify(&labels, 0.0);

        assert!(!titles(&result.issues).contains(&"Missing Handrail"));
        assert!(titles(&result.issues).contains(&"Handrail Present"));
    }

    #[test]
    fn test_handrail_later_in_frame_still_counts() {
        let labels = [
            DetectedLabel::new("Staircase", 80.0),
            DetectedLabel::new("Metal Railing", 70.0),
        ];
        let result = classify(&labels, 0.0);
        assert!(!titles(&result.issues).contains(&"Missing Handrail"));
    }

    #[test]
    fn test_glass_door_excludes_door_width() {
        let labels = [
            DetectedLabel::new("Door", 85.0),
            DetectedLabel::new("Glass", 75.0),
        ];
        let result = classify(&labels, 0.0);

        let door: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.title == "Glass Door Visibility")
            .collect();
        assert_eq!(door.len(), 1);
        assert_eq!(door[0].severity, Severity::Warning);
        assert!(!titles(&result.issues).contains(&"Verify Door Width"));
    }

    #[test]
    fn test_plain_door_gets_width_check() {
        let result = classify(&[DetectedLabel::new("Door", 85.0)], 0.0);
        let found = titles(&result.issues);
        assert!(found.contains(&"Verify Door Width"));
        assert!(!found.contains(&"Glass Door Visibility"));
    }

    #[test]
    fn test_braille_signage_boost() {
        let result = classify(&[DetectedLabel::new("Braille Signage", 70.0)], 0.0);

        let braille = result
            .issues
            .iter()
            .find(|i| i.title == "Braille Signage")
            .unwrap();
        assert_eq!(braille.severity, Severity::Success);
        assert_eq!(braille.confidence, 80.0);
    }

    #[test]
    fn test_boost_clamped_at_100() {
        let result = classify(&[DetectedLabel::new("Wheelchair Sign", 95.0)], 0.0);
        let marking = result
            .issues
            .iter()
            .find(|i| i.title == "Accessibility Marking")
            .unwrap();
        assert_eq!(marking.confidence, 100.0);
    }

    #[test]
    fn test_chair_overlapping_rules() {
        let result = classify(&[DetectedLabel::new("Chair", 92.0)], 0.0);
        assert!(result.issues.len() >= 2);
        let found = titles(&result.issues);
        assert!(found.contains(&"Furniture Detected"));
        assert!(found.contains(&"Seating/Furniture"));
    }

    #[test]
    fn test_crowded_area_threshold() {
        let crowded = classify(&[person_with(5)], 0.0);
        let hits: Vec<_> = crowded
            .issues
            .iter()
            .filter(|i| i.title == "Crowded Area")
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::Info);
        assert!(hits[0].bounding_box.is_none());

        let sparse = classify(&[person_with(2)], 0.0);
        assert!(!titles(&sparse.issues).contains(&"Crowded Area"));
    }

    #[test]
    fn test_unmatched_label() {
        let result = classify(&[DetectedLabel::new("Xyzzy", 50.0)], 0.0);
        assert!(result.issues.is_empty());
        assert_eq!(result.observations.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let result = classify(&[], 0.0);
        assert!(result.issues.is_empty());
        assert!(result.observations.is_empty());
    }

    #[test]
    fn test_observations_follow_input_order() {
        let labels = [
            DetectedLabel::new("Ramp", 60.0),
            DetectedLabel::new("Xyzzy", 10.0),
            DetectedLabel::default(),
            DetectedLabel::new("Door", 80.0),
        ];
        let result = classify(&labels, 1.0);

        let names: Vec<_> = result.observations.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(names, vec!["Ramp", "Xyzzy", "", "Door"]);
    }

    #[test]
    fn test_issues_are_idempotent() {
        let labels = [
            DetectedLabel::new("Stairs", 80.0),
            DetectedLabel::new("Door", 70.0),
            person_with(4),
        ];
        let first = classify(&labels, 2.5);
        let second = classify(&labels, 2.5);
        assert_eq!(first.issues, second.issues);
    }

    #[test]
    fn test_issue_order_follows_catalog() {
        // "Chair" hits furniture (1) before seating_furniture (5)
        let result = classify(&[DetectedLabel::new("Chair", 90.0)], 0.0);
        let ids: Vec<_> = result.issues.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["furniture", "seating_furniture"]);
    }

    #[test]
    fn test_templated_description_uses_label_name() {
        let result = classify(&[DetectedLabel::new("Potted Plant", 88.0)], 0.0);
        let decoration = result
            .issues
            .iter()
            .find(|i| i.rule_id == "decoration")
            .unwrap();
        assert_eq!(
            decoration.description,
            "Potted Plant detected - ensure not obstructing pathways."
        );
    }

    #[test]
    fn test_tactile_surface_needs_cue() {
        let plain = classify(&[DetectedLabel::new("Floor", 90.0)], 0.0);
        assert!(!titles(&plain.issues).contains(&"Tactile Warning Surface"));

        let tactile = classify(&[DetectedLabel::new("Yellow Floor", 90.0)], 0.0);
        assert!(titles(&tactile.issues).contains(&"Tactile Warning Surface"));
    }

    #[test]
    fn test_with_rules_restricts_catalog() {
        static ONLY_STAIRS: &[Rule] = &[Rule {
            id: "stairs",
            keywords: &["stair"],
            severity: Severity::Warning,
            title: "Stairs",
            description: Description::Fixed("stairs"),
            policy_reference: "ADA 504",
            confidence_boost: 0.0,
            attach_bounding_box: false,
            condition: Condition::Always,
        }];
        let engine = ComplianceEngine::with_rules(ONLY_STAIRS);
        let result = engine.classify(
            &[DetectedLabel::new("Stairs", 50.0), DetectedLabel::new("Chair", 50.0)],
            0.0,
        );
        assert_eq!(titles(&result.issues), vec!["Stairs"]);
        assert_eq!(engine.rules().len(), 1);
    }
}
