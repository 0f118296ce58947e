use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::aggregators::types::{GeoMarker, MarkerTier};
use crate::filter::FilteredView;
use crate::model::{ControlPointLocation, normalize_control_point};

/// Counts at or above this are [`MarkerTier::High`].
pub const HIGH_TRAFFIC_THRESHOLD: u64 = 50_000;

/// Passengers per unit of marker radius.
pub const RADIUS_SCALE: f64 = 1000.0;
pub const MIN_RADIUS: f64 = 5.0;
pub const MAX_RADIUS: f64 = 15.0;

/// Marker radius for a passenger count, clamped to `[MIN_RADIUS, MAX_RADIUS]`.
pub fn magnitude_radius(passenger_count: u64) -> f64 {
    (passenger_count as f64 / RADIUS_SCALE).clamp(MIN_RADIUS, MAX_RADIUS)
}

pub fn tier(passenger_count: u64) -> MarkerTier {
    if passenger_count >= HIGH_TRAFFIC_THRESHOLD {
        MarkerTier::High
    } else {
        MarkerTier::Low
    }
}

/// One marker per entry of `locations`, in table order, carrying the view's
/// passenger total for that control point (zero when it has no traffic).
///
/// Traffic at control points missing from `locations` has nowhere to be drawn
/// and is left out.
pub fn geo_markers(view: &FilteredView<'_>, locations: &[ControlPointLocation]) -> Vec<GeoMarker> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in view.iter() {
        let count = counts
            .entry(normalize_control_point(record.control_point()))
            .or_default();
        *count = count.saturating_add(record.passenger_count);
    }

    let markers: Vec<GeoMarker> = locations
        .iter()
        .map(|location| {
            let passenger_count = counts
                .get(&normalize_control_point(&location.control_point))
                .copied()
                .unwrap_or(0);
            GeoMarker {
                control_point: location.control_point.clone(),
                latitude: location.latitude,
                longitude: location.longitude,
                passenger_count,
                magnitude_radius: magnitude_radius(passenger_count),
                tier: tier(passenger_count),
            }
        })
        .collect();

    let known: HashSet<String> = locations
        .iter()
        .map(|l| normalize_control_point(&l.control_point))
        .collect();
    let unplaced: Vec<&str> = counts
        .keys()
        .filter(|name| !known.contains(*name))
        .map(String::as_str)
        .collect();
    if !unplaced.is_empty() {
        debug!(?unplaced, "Control points without coordinates left off the map");
    }

    markers
}
