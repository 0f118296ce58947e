//! Result types produced by the aggregators and handed to the presentation layer.

use chrono::NaiveDate;
use serde::Serialize;

/// Whether more people entered than left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

/// Arrivals and departures for one date, optionally for one control point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetFlowPoint {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_point: Option<String>,
    pub arrivals: u64,
    pub departures: u64,
    pub difference: i64,
}

impl NetFlowPoint {
    /// A zero difference counts as inflow.
    pub fn direction(&self) -> FlowDirection {
        if self.difference >= 0 {
            FlowDirection::Inflow
        } else {
            FlowDirection::Outflow
        }
    }
}

/// Headline numbers for the summary cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_passengers: u64,
    pub entry_volume: f64,
}

/// One bar of a category chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount<C> {
    pub category: C,
    pub passenger_count: u64,
}

/// Marker colour band on the traffic map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerTier {
    Low,
    High,
}

/// A map marker for one known control point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMarker {
    pub control_point: String,
    pub latitude: f64,
    pub longitude: f64,
    pub passenger_count: u64,
    pub magnitude_radius: f64,
    pub tier: MarkerTier,
}
