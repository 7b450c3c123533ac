//! ADA keyword rules
//!
//! A rule is a declarative record: which keywords trigger it, what it reports,
//! how much it boosts confidence, and an optional extra condition. The ordered
//! table lives in [`catalog`]; [`Rule::evaluate`] is the only evaluator.

pub mod catalog;

use shared_types::{DetectedLabel, Issue, Severity};

use crate::patterns::{contains_any, frame_contains_any};

pub use catalog::RULES;

/// Issue descriptions are either fixed text or a template with `{label}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Description {
    Fixed(&'static str),
    /// `{label}` is replaced with the label name as the vision service spelled it
    Templated(&'static str),
}

impl Description {
    pub fn render(&self, label_name: &str) -> String {
        match self {
            Description::Fixed(text) => text.to_string(),
            Description::Templated(template) => template.replace("{label}", label_name),
        }
    }
}

/// Extra requirement checked after the keyword match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// The label name must also contain one of these keywords
    NameAlsoContains(&'static [&'static str]),
    /// Some label in the frame (the current one included) contains a keyword
    FrameContains(&'static [&'static str]),
    /// No label in the frame (the current one included) contains a keyword
    FrameLacks(&'static [&'static str]),
    /// More than this many instances; a label without instances counts as one
    MoreInstancesThan(usize),
}

impl Condition {
    fn holds(&self, name: &str, label: &DetectedLabel, frame_names: &[String]) -> bool {
        match self {
            Condition::Always => true,
            Condition::NameAlsoContains(keywords) => contains_any(name, keywords),
            Condition::FrameContains(keywords) => frame_contains_any(frame_names, keywords),
            Condition::FrameLacks(keywords) => !frame_contains_any(frame_names, keywords),
            Condition::MoreInstancesThan(n) => label.instances.len().max(1) > *n,
        }
    }

    /// Whether the outcome depends on other labels in the same invocation
    pub fn is_cross_label(&self) -> bool {
        matches!(self, Condition::FrameContains(_) | Condition::FrameLacks(_))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub keywords: &'static [&'static str],
    pub severity: Severity,
    pub title: &'static str,
    pub description: Description,
    pub policy_reference: &'static str,
    /// Added to the label confidence, result clamped to 100
    pub confidence_boost: f64,
    pub attach_bounding_box: bool,
    pub condition: Condition,
}

impl Rule {
    /// Evaluate this rule against one label
    ///
    /// `name` is the lower-cased label name and `frame_names` every lower-cased
    /// name in the invocation, in input order.
    pub fn evaluate(
        &self,
        label: &DetectedLabel,
        name: &str,
        frame_names: &[String],
        timestamp: f64,
    ) -> Option<Issue> {
        if !contains_any(name, self.keywords) || !self.condition.holds(name, label, frame_names)
        {
            return None;
        }

        Some(Issue {
            rule_id: self.id.to_string(),
            severity: self.severity,
            title: self.title.to_string(),
            description: self.description.render(label.name()),
            timestamp,
            confidence: self.boosted_confidence(label.confidence()),
            bounding_box: if self.attach_bounding_box {
                label.first_bounding_box()
            } else {
                None
            },
            policy_reference: self.policy_reference.to_string(),
        })
    }

    /// Unboosted rules pass confidence through untouched, clamping only applies
    /// once a boost is added
    pub fn boosted_confidence(&self, confidence: f64) -> f64 {
        if self.confidence_boost > 0.0 {
            (confidence + self.confidence_boost).min(100.0)
        } else {
            confidence
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::BoundingBox;

    const TEST_RULE: Rule = Rule {
        id: "test_rule",
        keywords: &["ramp"],
        severity: Severity::Success,
        title: "Ramp",
        description: Description::Templated("{label} seen"),
        policy_reference: "ADA 405",
        confidence_boost: 10.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    };

    fn frame(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    #[test]
    fn test_templated_description_keeps_original_case() {
        let label = DetectedLabel::new("Wheelchair Ramp", 50.0);
        let issue = TEST_RULE
            .evaluate(&label, "wheelchair ramp", &frame(&["Wheelchair Ramp"]), 2.0)
            .unwrap();
        assert_eq!(issue.description, "Wheelchair Ramp seen");
        assert_eq!(issue.confidence, 60.0);
        assert_eq!(issue.timestamp, 2.0);
    }

    #[test]
    fn test_boost_is_clamped() {
        assert_eq!(TEST_RULE.boosted_confidence(95.0), 100.0);
    }

    #[test]
    fn test_unboosted_confidence_passes_through() {
        let rule = Rule {
            confidence_boost: 0.0,
            ..TEST_RULE
        };
        assert_eq!(rule.boosted_confidence(120.0), 120.0);
    }

    #[test]
    fn test_bounding_box_only_when_attached() {
        let bbox = BoundingBox {
            left: 0.1,
            top: 0.2,
            width: 0.3,
            height: 0.4,
        };
        let label = DetectedLabel::new("Ramp", 80.0).with_box(bbox);
        let names = frame(&["Ramp"]);

        let with_box = TEST_RULE.evaluate(&label, "ramp", &names, 0.0).unwrap();
        assert_eq!(with_box.bounding_box, Some(bbox));

        let rule = Rule {
            attach_bounding_box: false,
            ..TEST_RULE
        };
        let without_box = rule.evaluate(&label, "ramp", &names, 0.0).unwrap();
        assert!(without_box.bounding_box.is_none());
    }

    #[test]
    fn test_frame_conditions() {
        let label = DetectedLabel::new("Ramp", 80.0);
        let lacks = Rule {
            condition: Condition::FrameLacks(&["rail"]),
            ..TEST_RULE
        };
        assert!(lacks
            .evaluate(&label, "ramp", &frame(&["Ramp"]), 0.0)
            .is_some());
        assert!(lacks
            .evaluate(&label, "ramp", &frame(&["Ramp", "Handrail"]), 0.0)
            .is_none());
        assert!(lacks.condition.is_cross_label());
    }

    #[test]
    fn test_instance_count_condition() {
        let rule = Rule {
            condition: Condition::MoreInstancesThan(3),
            ..TEST_RULE
        };
        let mut label = DetectedLabel::new("Ramp", 80.0);
        assert!(rule.evaluate(&label, "ramp", &[], 0.0).is_none());

        label.instances = vec![Default::default(); 4];
        assert!(rule.evaluate(&label, "ramp", &[], 0.0).is_some());
    }
}
