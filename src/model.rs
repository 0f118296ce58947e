//! Core data types for the passenger traffic table.
//!
//! A [`Dataset`] is built once at start-up and then only read. Every view and
//! aggregate borrows from it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseCategoryError;
use crate::filter::FilteredView;
use crate::travel_method;

/// Direction of travel through a control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TravelType {
    Arrival,
    Departure,
}

impl TravelType {
    pub const ALL: [TravelType; 2] = [TravelType::Arrival, TravelType::Departure];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelType::Arrival => "Arrival",
            TravelType::Departure => "Departure",
        }
    }
}

impl fmt::Display for TravelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelType {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TravelType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError::new("travel_type", s))
    }
}

/// Who the passenger is, as reported by the immigration department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PassengerOrigin {
    #[serde(rename = "Hong Kong Residents")]
    HongKongResidents,
    #[serde(rename = "Mainland Visitors")]
    MainlandVisitors,
    #[serde(rename = "Other Visitors")]
    OtherVisitors,
}

impl PassengerOrigin {
    /// Display order used by the origin chart.
    pub const ALL: [PassengerOrigin; 3] = [
        PassengerOrigin::HongKongResidents,
        PassengerOrigin::MainlandVisitors,
        PassengerOrigin::OtherVisitors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerOrigin::HongKongResidents => "Hong Kong Residents",
            PassengerOrigin::MainlandVisitors => "Mainland Visitors",
            PassengerOrigin::OtherVisitors => "Other Visitors",
        }
    }

    /// Residents returning home are not counted as visitor entries.
    pub fn is_visitor(&self) -> bool {
        !matches!(self, PassengerOrigin::HongKongResidents)
    }
}

impl fmt::Display for PassengerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassengerOrigin {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PassengerOrigin::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError::new("passenger_origin", s))
    }
}

/// How the passenger crossed, derived from the control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TravelMethod {
    #[serde(rename = "by land")]
    Land,
    #[serde(rename = "by air")]
    Air,
    #[serde(rename = "by sea")]
    Sea,
}

impl TravelMethod {
    /// Display order used by the travel method chart.
    pub const ALL: [TravelMethod; 3] = [TravelMethod::Land, TravelMethod::Air, TravelMethod::Sea];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMethod::Land => "by land",
            TravelMethod::Air => "by air",
            TravelMethod::Sea => "by sea",
        }
    }
}

impl fmt::Display for TravelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the canonical long-format table.
///
/// `control_point` and `travel_method` are private and only change together,
/// so the method can never disagree with the control point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerRecord {
    pub date: NaiveDate,
    control_point: String,
    pub travel_type: TravelType,
    pub passenger_origin: PassengerOrigin,
    pub passenger_count: u64,
    travel_method: TravelMethod,
}

impl PassengerRecord {
    pub fn new(
        date: NaiveDate,
        control_point: impl Into<String>,
        travel_type: TravelType,
        passenger_origin: PassengerOrigin,
        passenger_count: u64,
    ) -> Self {
        let control_point = control_point.into().trim().to_string();
        let travel_method = travel_method::classify(&control_point);
        Self {
            date,
            control_point,
            travel_type,
            passenger_origin,
            passenger_count,
            travel_method,
        }
    }

    /// Renames the control point and re-derives the travel method.
    pub fn with_control_point(self, control_point: impl Into<String>) -> Self {
        Self::new(
            self.date,
            control_point,
            self.travel_type,
            self.passenger_origin,
            self.passenger_count,
        )
    }

    pub fn control_point(&self) -> &str {
        &self.control_point
    }

    pub fn travel_method(&self) -> TravelMethod {
        self.travel_method
    }
}

/// Static coordinates for a known control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPointLocation {
    pub control_point: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Lower-cases and collapses whitespace so padded upstream names still match.
pub fn normalize_control_point(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The loaded passenger table. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<PassengerRecord>,
    bounds: Option<(NaiveDate, NaiveDate)>,
}

impl Dataset {
    pub fn new(records: Vec<PassengerRecord>) -> Self {
        let bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.date, r.date)),
            Some((min, max)) => Some((min.min(r.date), max.max(r.date))),
        });
        Self { records, bounds }
    }

    pub fn records(&self) -> &[PassengerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date present, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.bounds
    }

    /// Distinct control points in order of first appearance.
    pub fn control_points(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(normalize_control_point(r.control_point())))
            .map(PassengerRecord::control_point)
            .collect()
    }

    /// An unfiltered view over every record.
    pub fn view_all(&self) -> FilteredView<'_> {
        FilteredView::new(self.records.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_travel_type_parse_is_lenient_on_case_and_padding() {
        assert_eq!(" arrival ".parse::<TravelType>().unwrap(), TravelType::Arrival);
        assert_eq!("Departure".parse::<TravelType>().unwrap(), TravelType::Departure);
        assert!("Transit".parse::<TravelType>().is_err());
    }

    #[test]
    fn test_passenger_origin_parse() {
        assert_eq!(
            "Mainland Visitors".parse::<PassengerOrigin>().unwrap(),
            PassengerOrigin::MainlandVisitors
        );
        assert!("Total".parse::<PassengerOrigin>().is_err());
    }

    #[test]
    fn test_record_derives_travel_method() {
        let r = PassengerRecord::new(
            date(2025, 1, 1),
            "  China Ferry Terminal ",
            TravelType::Arrival,
            PassengerOrigin::OtherVisitors,
            5,
        );
        assert_eq!(r.control_point(), "China Ferry Terminal");
        assert_eq!(r.travel_method(), TravelMethod::Sea);
    }

    #[test]
    fn test_renamed_record_rederives_travel_method() {
        let r = PassengerRecord::new(
            date(2025, 1, 1),
            "Airport",
            TravelType::Arrival,
            PassengerOrigin::MainlandVisitors,
            5,
        );
        assert_eq!(r.travel_method(), TravelMethod::Air);

        let r = r.with_control_point(" Lo Wu ");
        assert_eq!(r.control_point(), "Lo Wu");
        assert_eq!(r.travel_method(), TravelMethod::Land);
        assert_eq!(r.passenger_count, 5);
    }

    #[test]
    fn test_record_serializes_derived_travel_method() {
        let r = PassengerRecord::new(
            date(2025, 1, 1),
            "Harbour Control",
            TravelType::Departure,
            PassengerOrigin::OtherVisitors,
            2,
        );
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["control_point"], "Harbour Control");
        assert_eq!(json["travel_method"], "by sea");
    }

    #[test]
    fn test_dataset_bounds_and_control_points() {
        let ds = Dataset::new(vec![
            PassengerRecord::new(
                date(2025, 1, 3),
                "Lo Wu",
                TravelType::Arrival,
                PassengerOrigin::HongKongResidents,
                1,
            ),
            PassengerRecord::new(
                date(2025, 1, 1),
                "Airport",
                TravelType::Arrival,
                PassengerOrigin::HongKongResidents,
                1,
            ),
            PassengerRecord::new(
                date(2025, 1, 2),
                "lo  wu",
                TravelType::Departure,
                PassengerOrigin::HongKongResidents,
                1,
            ),
        ]);

        assert_eq!(ds.date_bounds(), Some((date(2025, 1, 1), date(2025, 1, 3))));
        assert_eq!(ds.control_points(), vec!["Lo Wu", "Airport"]);
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert_eq!(ds.date_bounds(), None);
        assert!(ds.view_all().is_empty());
    }
}
