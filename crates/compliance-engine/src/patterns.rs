//! Keyword sets shared between rules and the matching helpers
//!
//! Matching is case-insensitive substring matching: "rail" matches "Handrail"
//! and "Railway" alike. Callers lower-case the label name once and pass it in.

/// Labels whose presence anywhere in the frame counts as a handrail
pub const HANDRAIL_KEYWORDS: &[&str] = &["handrail", "railing", "rail"];

/// Labels whose presence anywhere in the frame marks a door as glass
pub const GLASS_KEYWORDS: &[&str] = &["glass"];

/// Door and entryway keywords
pub const DOOR_KEYWORDS: &[&str] = &["door", "doorway", "entrance", "exit"];

/// Floor-like surfaces that may carry detectable warnings
pub const WALKING_SURFACE_KEYWORDS: &[&str] = &["tile", "floor", "surface", "pavement", "ground"];

/// Texture or colour cues of a detectable warning surface
pub const TACTILE_CUE_KEYWORDS: &[&str] = &["yellow", "textured", "bumpy"];

/// Elevator keywords (two independent rules use them)
pub const ELEVATOR_KEYWORDS: &[&str] = &["elevator", "lift"];

/// Returns true if the already lower-cased `name` contains any keyword
pub fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

/// Lower-case every label name once so frame-wide checks stay cheap
pub fn lowered_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(str::to_lowercase).collect()
}

/// Returns true if any of the lower-cased frame names contains a keyword
pub fn frame_contains_any(frame_names: &[String], keywords: &[&str]) -> bool {
    frame_names.iter().any(|name| contains_any(name, keywords))
}
