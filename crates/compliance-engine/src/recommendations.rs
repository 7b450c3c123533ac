//! Follow-up recommendations derived from a set of findings

use shared_types::{Effort, Impact, Recommendation, Severity, SubmittedIssue};

/// What a recommendation says, before it gets an id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationTemplate {
    pub title: &'static str,
    pub impact: Impact,
    pub effort: Effort,
    pub policy: &'static str,
    pub rationale: &'static str,
}

impl RecommendationTemplate {
    pub fn to_recommendation(&self, rec_id: String) -> Recommendation {
        Recommendation {
            rec_id,
            title: self.title.to_string(),
            impact: self.impact,
            effort: self.effort,
            policy: self.policy.to_string(),
            rationale: self.rationale.to_string(),
        }
    }
}

pub const CRITICAL_VIOLATIONS: RecommendationTemplate = RecommendationTemplate {
    title: "Address Critical ADA Violations",
    impact: Impact::High,
    effort: Effort::Medium,
    policy: "ADA Title III",
    rationale: "Critical violations detected that may prevent access for individuals with disabilities",
};

pub const HANDRAILS: RecommendationTemplate = RecommendationTemplate {
    title: "Install or Repair Handrails on Stairs",
    impact: Impact::High,
    effort: Effort::Low,
    policy: "ADA 505.2",
    rationale: "Handrails are required on both sides of stairs for safety and accessibility",
};

pub const DOOR_WIDTH: RecommendationTemplate = RecommendationTemplate {
    title: "Verify Door Clear Width Compliance",
    impact: Impact::High,
    effort: Effort::High,
    policy: "ADA 404.2.3",
    rationale: "Doors must have minimum 32\" clear width for wheelchair accessibility",
};

pub const LIGHTING: RecommendationTemplate = RecommendationTemplate {
    title: "Improve Lighting Conditions",
    impact: Impact::Medium,
    effort: Effort::Low,
    policy: "ANSI A117.1",
    rationale: "Adequate lighting is essential for navigation and safety",
};

/// Title fragments of non-success findings that trigger a specific template
const TITLE_TRIGGERS: &[(&str, RecommendationTemplate)] = &[
    ("Handrail", HANDRAILS),
    ("Door Width", DOOR_WIDTH),
    ("Lighting", LIGHTING),
];

/// Pick the templates that apply to a set of `(severity, title)` findings
///
/// Each template is returned at most once, critical violations first. A
/// finding without a known severity only takes part in the title triggers.
pub fn derive_templates<'a, I>(findings: I) -> Vec<RecommendationTemplate>
where
    I: IntoIterator<Item = (Option<Severity>, &'a str)>,
{
    let findings: Vec<(Option<Severity>, &str)> = findings.into_iter().collect();
    let mut templates = Vec::new();

    if findings
        .iter()
        .any(|(severity, _)| *severity == Some(Severity::Error))
    {
        templates.push(CRITICAL_VIOLATIONS);
    }

    for (fragment, template) in TITLE_TRIGGERS {
        let triggered = findings.iter().any(|(severity, title)| {
            *severity != Some(Severity::Success) && title.contains(fragment)
        });
        if triggered {
            templates.push(*template);
        }
    }

    templates
}

/// Recommendations for the issues a client submitted with an analysis
pub fn from_submitted(
    issues: &[SubmittedIssue],
    mut next_id: impl FnMut() -> String,
) -> Vec<Recommendation> {
    derive_templates(
        issues
            .iter()
            .map(|i| (i.severity, i.title.as_deref().unwrap_or(""))),
    )
    .iter()
    .map(|t| t.to_recommendation(next_id()))
    .collect()
}
