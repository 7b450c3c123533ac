//! Per-label observations
//!
//! Every label yields exactly one observation, matched or not. When no
//! instance carries a measured box, the first instance (or a new one, if there
//! are none) gets a placeholder box so overlays always have something to draw;
//! those observations are flagged `synthetic`.

use rand::Rng;
use shared_types::{BoundingBox, DetectedLabel, Instance, Observation};

/// Side length of a placeholder box, as a fraction of the frame
pub const PLACEHOLDER_SIZE: f64 = 0.1;

/// Placeholder top-left corners are drawn from `[0, PLACEHOLDER_MAX_ORIGIN)`
pub const PLACEHOLDER_MAX_ORIGIN: f64 = 0.8;

pub fn observe<R: Rng + ?Sized>(label: &DetectedLabel, timestamp: f64, rng: &mut R) -> Observation {
    let confidence = label.confidence();

    if label.has_bounding_box() {
        return Observation {
            label: label.name().to_string(),
            confidence,
            instances: label.instances.clone(),
            timestamp,
            synthetic: false,
        };
    }

    let mut instances = label.instances.clone();
    match instances.first_mut() {
        Some(first) => {
            first.bounding_box = Some(placeholder_box(rng));
            first.confidence.get_or_insert(confidence);
        }
        None => instances.push(Instance {
            bounding_box: Some(placeholder_box(rng)),
            confidence: Some(confidence),
        }),
    }

    Observation {
        label: label.name().to_string(),
        confidence,
        instances,
        timestamp,
        synthetic: true,
    }
}

fn placeholder_box<R: Rng + ?Sized>(rng: &mut R) -> BoundingBox {
    BoundingBox {
        left: rng.gen_range(0.0..PLACEHOLDER_MAX_ORIGIN),
        top: rng.gen_range(0.0..PLACEHOLDER_MAX_ORIGIN),
        width: PLACEHOLDER_SIZE,
        height: PLACEHOLDER_SIZE,
    }
}
