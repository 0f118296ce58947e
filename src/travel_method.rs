//! Control point to travel method mapping.

use crate::model::TravelMethod;

/// Keyword rules checked in order against the control point name.
/// The first keyword contained in the name wins; no match means land.
pub static TRAVEL_METHOD_RULES: &[(&str, TravelMethod)] = &[
    ("Airport", TravelMethod::Air),
    ("Terminal", TravelMethod::Sea),
    ("Harbour", TravelMethod::Sea),
];

/// Classifies a control point by name using [`TRAVEL_METHOD_RULES`].
pub fn classify(control_point: &str) -> TravelMethod {
    classify_with(TRAVEL_METHOD_RULES, control_point)
}

/// Same as [`classify`] but against a caller-supplied rule table.
pub fn classify_with(rules: &[(&str, TravelMethod)], control_point: &str) -> TravelMethod {
    rules
        .iter()
        .find(|(keyword, _)| control_point.contains(keyword))
        .map_or(TravelMethod::Land, |(_, method)| *method)
}
