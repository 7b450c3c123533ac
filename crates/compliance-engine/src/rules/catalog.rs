//! The ordered ADA rule catalog
//!
//! Order matters: issues for one label come out in table order. Entries are
//! independent and overlap on purpose ("chair" hits both `furniture` and
//! `seating_furniture`). Do not merge entries that share keywords; every entry
//! contributes its own issue.

use shared_types::Severity;

use super::{Condition, Description, Rule};
use crate::patterns::{
    DOOR_KEYWORDS, ELEVATOR_KEYWORDS, GLASS_KEYWORDS, HANDRAIL_KEYWORDS, TACTILE_CUE_KEYWORDS,
    WALKING_SURFACE_KEYWORDS,
};

pub static RULES: &[Rule] = &[
    // ========================================================================
    // FIXTURES AND FURNISHINGS
    // ========================================================================
    Rule {
        id: "furniture",
        keywords: &["furniture", "chair", "table", "desk", "bench", "counter"],
        severity: Severity::Info,
        title: "Furniture Detected",
        description: Description::Templated(
            "{label} identified - verify clearance for wheelchair navigation (min 36\" pathways).",
        ),
        policy_reference: "ADA 403.5.1",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "transparent_surface",
        keywords: &["window", "glass", "mirror"],
        severity: Severity::Warning,
        title: "Transparent Surface",
        description: Description::Templated("{label} detected - ensure visibility markings for safety."),
        policy_reference: "ADA 404.1",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "display_screen",
        keywords: &["television", "tv", "screen", "monitor", "display"],
        severity: Severity::Info,
        title: "Display/Screen",
        description: Description::Templated(
            "{label} detected - verify closed captioning capability for hearing impaired.",
        ),
        policy_reference: "ADA 707 - TTYs",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "accessible_controls",
        keywords: &["switch", "outlet", "socket", "control", "thermostat"],
        severity: Severity::Success,
        title: "Accessible Controls",
        description: Description::Fixed(
            "Light switch/control detected - verify mounted at accessible height (15\"-48\").",
        ),
        policy_reference: "ADA 308.3 - Reach Ranges",
        confidence_boost: 20.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "seating_furniture",
        keywords: &["chair", "seat", "furniture"],
        severity: Severity::Info,
        title: "Seating/Furniture",
        description: Description::Templated(
            "{label} detected - ensure accessible seating options and clear pathways.",
        ),
        policy_reference: "ADA 802 - Assembly Areas",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "work_surface",
        keywords: &["table", "desk", "surface"],
        severity: Severity::Warning,
        title: "Work Surface",
        description: Description::Templated(
            "{label} detected - verify knee clearance (27\" min height) for wheelchair access.",
        ),
        policy_reference: "ADA 902 - Dining/Work Surfaces",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    // ========================================================================
    // POSITIVE ACCESSIBILITY FEATURES (boosted)
    // ========================================================================
    Rule {
        id: "braille_signage",
        keywords: &["sign", "text", "plaque", "label", "nameplate"],
        severity: Severity::Success,
        title: "Braille Signage",
        description: Description::Fixed(
            "Tactile signage detected - compliant with ADA requirements for visual impairment accessibility.",
        ),
        policy_reference: "ADA 703.3 - Braille Required",
        confidence_boost: 10.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "automatic_door_control",
        keywords: &["button", "switch", "push", "control", "panel"],
        severity: Severity::Success,
        title: "Automatic Door Control",
        description: Description::Fixed(
            "Push button/automatic door opener detected - provides accessible entry for mobility impaired individuals.",
        ),
        policy_reference: "ADA 404.3 - Automatic Doors",
        confidence_boost: 15.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "handrail_present",
        keywords: &["handrail", "railing", "rail", "banister", "balustrade"],
        severity: Severity::Success,
        title: "Handrail Present",
        description: Description::Fixed(
            "Safety handrail detected - compliant with requirements for stair and ramp safety.",
        ),
        policy_reference: "ADA 505 - Handrails Compliant",
        confidence_boost: 20.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "accessibility_marking",
        keywords: &["wheelchair", "accessible", "handicap", "disability", "ada"],
        severity: Severity::Success,
        title: "Accessibility Marking",
        description: Description::Fixed(
            "International Symbol of Accessibility detected - proper marking of accessible features.",
        ),
        policy_reference: "ADA 703.7.2.1 - ISA Symbol",
        confidence_boost: 25.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "elevator_access",
        keywords: ELEVATOR_KEYWORDS,
        severity: Severity::Success,
        title: "Elevator Access",
        description: Description::Fixed(
            "Elevator detected - provides vertical accessibility for all users.",
        ),
        policy_reference: "ADA 407 - Elevators",
        confidence_boost: 20.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "tactile_warning_surface",
        keywords: WALKING_SURFACE_KEYWORDS,
        severity: Severity::Success,
        title: "Tactile Warning Surface",
        description: Description::Fixed(
            "Detectable warning surface identified - assists visually impaired navigation.",
        ),
        policy_reference: "ADA 705 - Detectable Warnings",
        confidence_boost: 15.0,
        attach_bounding_box: true,
        condition: Condition::NameAlsoContains(TACTILE_CUE_KEYWORDS),
    },
    Rule {
        id: "accessible_parking",
        keywords: &["parking", "reserved"],
        severity: Severity::Success,
        title: "Accessible Parking",
        description: Description::Fixed(
            "Designated accessible parking area detected with proper signage.",
        ),
        policy_reference: "ADA 502 - Parking Spaces",
        confidence_boost: 20.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "assistive_listening",
        keywords: &["speaker", "audio", "sound"],
        severity: Severity::Success,
        title: "Assistive Listening",
        description: Description::Fixed(
            "Audio assistance system detected - supports hearing impaired individuals.",
        ),
        policy_reference: "ADA 706 - Assistive Listening",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "adequate_lighting",
        keywords: &["light", "lamp", "chandelier", "fixture", "illumination"],
        severity: Severity::Success,
        title: "Adequate Lighting",
        description: Description::Templated(
            "{label} present - proper illumination for safe navigation.",
        ),
        policy_reference: "ANSI A117.1",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    // ========================================================================
    // EQUIPMENT, DECOR AND OBSTRUCTIONS
    // ========================================================================
    Rule {
        id: "electronic_equipment",
        keywords: &["screen", "monitor", "display", "kiosk", "terminal", "machine"],
        severity: Severity::Info,
        title: "Electronic Equipment",
        description: Description::Templated(
            "{label} detected - verify accessible height (15\"-48\" reach range).",
        ),
        policy_reference: "ADA 308.2",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "decoration",
        keywords: &["plant", "tree", "flower", "decoration", "art", "painting"],
        severity: Severity::Info,
        title: "Decoration/Plant",
        description: Description::Templated("{label} detected - ensure not obstructing pathways."),
        policy_reference: "ADA 307.2",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "waste_receptacle",
        keywords: &["trash", "bin", "waste", "recycling", "garbage"],
        severity: Severity::Info,
        title: "Waste Receptacle",
        description: Description::Templated(
            "{label} detected - verify accessible placement and opening.",
        ),
        policy_reference: "ADA 305",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "vertical_obstruction",
        keywords: &["column", "pillar", "post", "pole", "support"],
        severity: Severity::Warning,
        title: "Vertical Obstruction",
        description: Description::Templated(
            "{label} detected - ensure adequate clearance around structure.",
        ),
        policy_reference: "ADA 307.3",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "overhead_element",
        keywords: &["ceiling", "overhead", "beam"],
        severity: Severity::Info,
        title: "Overhead Element",
        description: Description::Templated(
            "{label} detected - verify minimum 80\" clearance height.",
        ),
        policy_reference: "ADA 307.4",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "safety_equipment",
        keywords: &["fire extinguisher", "alarm", "emergency", "exit sign", "safety"],
        severity: Severity::Success,
        title: "Safety Equipment",
        description: Description::Templated(
            "{label} identified - verify accessible mounting height.",
        ),
        policy_reference: "ADA 308.3",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "physical_barrier",
        keywords: &["bollard", "barrier", "fence", "gate", "rail"],
        severity: Severity::Warning,
        title: "Physical Barrier",
        description: Description::Templated("{label} detected - ensure accessible route available."),
        policy_reference: "ADA 206.2",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "seating_area",
        keywords: &["seat", "sofa", "couch", "lounge", "waiting area"],
        severity: Severity::Info,
        title: "Seating Area",
        description: Description::Templated(
            "{label} detected - verify accessible seating options available.",
        ),
        policy_reference: "ADA 221",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "service_counter",
        keywords: &["reception", "counter", "service", "desk", "information"],
        severity: Severity::Warning,
        title: "Service Counter",
        description: Description::Templated(
            "{label} detected - verify lowered section at 36\" max height.",
        ),
        policy_reference: "ADA 904.4",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "self_service_machine",
        keywords: &["vending", "atm", "ticket"],
        severity: Severity::Warning,
        title: "Self-Service Machine",
        description: Description::Templated(
            "{label} detected - verify controls within reach range.",
        ),
        policy_reference: "ADA 308",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    // ========================================================================
    // CIRCULATION (stairs, paths, doors, level changes)
    // ========================================================================
    Rule {
        id: "missing_handrail",
        keywords: &["stairs", "staircase", "steps", "stairway", "stair"],
        severity: Severity::Error,
        title: "Missing Handrail",
        description: Description::Fixed(
            "Stairs detected without visible handrails. ADA requires continuous handrails on both sides of stairs.",
        ),
        policy_reference: "ADA 505.2",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::FrameLacks(HANDRAIL_KEYWORDS),
    },
    Rule {
        id: "pathway_width",
        keywords: &["hallway", "corridor", "path"],
        severity: Severity::Warning,
        title: "Check Pathway Width",
        description: Description::Fixed(
            "Pathway detected - verify minimum 36\" clear width for wheelchair access.",
        ),
        policy_reference: "ADA 403.5",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    // The two door entries are exclusive: exactly one fires per door label.
    Rule {
        id: "glass_door_visibility",
        keywords: DOOR_KEYWORDS,
        severity: Severity::Warning,
        title: "Glass Door Visibility",
        description: Description::Fixed(
            "Glass door detected - ensure contrast markings are present at eye level for visibility.",
        ),
        policy_reference: "ADA 404.1",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::FrameContains(GLASS_KEYWORDS),
    },
    Rule {
        id: "door_width",
        keywords: DOOR_KEYWORDS,
        severity: Severity::Info,
        title: "Verify Door Width",
        description: Description::Fixed(
            "Door detected - verify minimum 32\" clear width when open 90 degrees.",
        ),
        policy_reference: "ADA 404.2.3",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::FrameLacks(GLASS_KEYWORDS),
    },
    Rule {
        id: "level_change",
        keywords: &["threshold", "step", "curb"],
        severity: Severity::Warning,
        title: "Level Change Detected",
        description: Description::Fixed(
            "Potential trip hazard - thresholds should not exceed 1/2\" height.",
        ),
        policy_reference: "ADA 303",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "accessible_ramp",
        keywords: &["ramp", "slope"],
        severity: Severity::Success,
        title: "Accessible Ramp Detected",
        description: Description::Fixed(
            "Ramp gradient appears compliant at approximately 1:12 slope ratio.",
        ),
        policy_reference: "ADA 405.2",
        confidence_boost: 0.0,
        attach_bounding_box: false,
        condition: Condition::Always,
    },
    Rule {
        id: "accessible_signage",
        keywords: &["sign", "signage"],
        severity: Severity::Success,
        title: "Accessible Signage",
        description: Description::Fixed(
            "Braille and raised character signage detected at appropriate mounting height.",
        ),
        policy_reference: "ADA 703.2",
        confidence_boost: 0.0,
        attach_bounding_box: false,
        condition: Condition::Always,
    },
    Rule {
        id: "poor_lighting",
        keywords: &["dark", "dim", "shadow"],
        severity: Severity::Warning,
        title: "Poor Lighting Conditions",
        description: Description::Fixed(
            "Area appears dimly lit. Adequate lighting is essential for safe navigation, especially for visually impaired individuals.",
        ),
        policy_reference: "ADA 206.5",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "parking_area",
        keywords: &["parking", "car", "vehicle"],
        severity: Severity::Info,
        title: "Parking Area",
        description: Description::Fixed(
            "Parking area detected - verify accessible parking spaces with proper width and access aisles.",
        ),
        policy_reference: "ADA 502",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "crowded_area",
        keywords: &["person", "people", "crowd"],
        severity: Severity::Info,
        title: "Crowded Area",
        description: Description::Fixed(
            "Multiple people detected - ensure clear paths of travel are maintained.",
        ),
        policy_reference: "ADA 403.5",
        confidence_boost: 0.0,
        attach_bounding_box: false,
        condition: Condition::MoreInstancesThan(3),
    },
    Rule {
        id: "floor_surface",
        keywords: &["floor", "carpet", "mat", "rug"],
        severity: Severity::Info,
        title: "Floor Surface",
        description: Description::Fixed(
            "Floor surface detected - ensure stable, firm, and slip-resistant surface.",
        ),
        policy_reference: "ADA 302",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "accessibility_equipment",
        keywords: &["wheelchair", "accessibility", "mobility", "walker", "crutch", "cane"],
        severity: Severity::Success,
        title: "Accessibility Equipment",
        description: Description::Templated("{label} detected - accessible facility confirmed"),
        policy_reference: "ADA Compliant",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "restroom_facility",
        keywords: &["restroom", "bathroom", "toilet", "sink", "urinal"],
        severity: Severity::Warning,
        title: "Restroom Facility",
        description: Description::Templated("{label} detected - verify ADA compliant fixtures."),
        policy_reference: "ADA 603-609",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "water_feature",
        keywords: &["fountain", "water", "drinking"],
        severity: Severity::Info,
        title: "Water Feature",
        description: Description::Templated(
            "{label} detected - verify accessible height and controls.",
        ),
        policy_reference: "ADA 602",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "control_device",
        keywords: &["switch", "button", "control", "thermostat", "panel"],
        severity: Severity::Info,
        title: "Control Device",
        description: Description::Templated("{label} detected - verify mounting height 15\"-48\"."),
        policy_reference: "ADA 309.3",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "outdoor_surface",
        keywords: &["sidewalk", "pavement", "concrete", "asphalt", "pathway"],
        severity: Severity::Info,
        title: "Outdoor Surface",
        description: Description::Templated(
            "{label} detected - check for cracks and level changes.",
        ),
        policy_reference: "ADA 302.3",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "temporary_obstruction",
        keywords: &["construction", "maintenance", "repair", "cone", "caution"],
        severity: Severity::Error,
        title: "Temporary Obstruction",
        description: Description::Templated(
            "{label} detected - ensure alternate accessible route provided.",
        ),
        policy_reference: "ADA 206.2.2",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "congestion",
        keywords: &["crowd", "group", "gathering"],
        severity: Severity::Warning,
        title: "Congestion",
        description: Description::Templated("{label} detected - may impede accessible routes."),
        policy_reference: "ADA 403.5",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "potential_obstacle_object",
        keywords: &["bag", "luggage", "box", "package", "obstruction"],
        severity: Severity::Warning,
        title: "Potential Obstacle",
        description: Description::Templated("{label} detected - may obstruct pathway."),
        policy_reference: "ADA 307.5",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "potential_obstacle",
        keywords: &["obstacle", "barrier", "blocked"],
        severity: Severity::Warning,
        title: "Potential Obstacle",
        description: Description::Fixed("Detected potential barrier to accessibility"),
        policy_reference: "ADA 307",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
    Rule {
        id: "elevator_compliance",
        keywords: ELEVATOR_KEYWORDS,
        severity: Severity::Success,
        title: "Elevator Access",
        description: Description::Fixed(
            "Elevator detected - verify compliance with call button height and braille signage",
        ),
        policy_reference: "ADA 407",
        confidence_boost: 0.0,
        attach_bounding_box: true,
        condition: Condition::Always,
    },
];

/// Look up a rule by id
pub fn find_rule(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.id == id)
}
