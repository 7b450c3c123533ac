//! Detection input and compliance output types
//!
//! `DetectedLabel`, `Instance` and `BoundingBox` keep the PascalCase field names
//! the vision service emits so payloads deserialize without translation. The
//! types produced here (`Issue`, `Observation`) use camelCase.

/// Fractional image coordinates, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl BoundingBox {
    /// `[left, top, width, height]`, the order markers are stored in
    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.top, self.width, self.height]
    }
}

/// One detected occurrence of a label
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParentLabel {
    #[serde(default)]
    pub name: Option<String>,
}

/// A label as returned by the vision service
///
/// Every field may be absent on the wire. Use the accessors for the neutral
/// defaults: an absent name is `""` and an absent confidence is `0`.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DetectedLabel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentLabel>,
}

impl DetectedLabel {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: Some(name.into()),
            confidence: Some(confidence),
            instances: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Builder-style helper that appends an instance with a bounding box
    pub fn with_box(mut self, bounding_box: BoundingBox) -> Self {
        let confidence = self.confidence;
        self.instances.push(Instance {
            bounding_box: Some(bounding_box),
            confidence,
        });
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn confidence(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// Bounding box of the first instance, if that instance has one
    pub fn first_bounding_box(&self) -> Option<BoundingBox> {
        self.instances.first().and_then(|i| i.bounding_box)
    }

    pub fn has_bounding_box(&self) -> bool {
        self.instances.iter().any(|i| i.bounding_box.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral detection, no immediate action
    Info,
    /// Ambiguous condition that needs human verification
    Warning,
    /// Confirmed violation
    Error,
    /// Confirmed compliant feature
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Success => "success",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub rule_id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub timestamp: f64, // seconds into the video
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    pub policy_reference: String, // e.g., "ADA 505.2"
}

/// Per-label visibility record, emitted whether or not any rule matched
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub label: String,
    pub confidence: f64,
    pub instances: Vec<Instance>,
    pub timestamp: f64,
    /// True when `instances` holds a placeholder box rather than a measured one
    pub synthetic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameAnalysis {
    pub issues: Vec<Issue>,
    pub observations: Vec<Observation>,
}

impl FrameAnalysis {
    pub fn extend(&mut self, other: FrameAnalysis) {
        self.issues.extend(other.issues);
        self.observations.extend(other.observations);
    }
}
