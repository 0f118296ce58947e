use crate::aggregators::types::Totals;
use crate::aggregators::utility::round_to;
use crate::filter::FilteredView;
use crate::model::TravelType;

/// Population baseline used to normalise visitor entries.
pub const POPULATION: f64 = 7_540_000.0;

/// Decimal places kept on [`Totals::entry_volume`].
pub const ENTRY_VOLUME_PRECISION: i32 = 8;

/// Total passengers and the visitor entry rate for a view.
///
/// `entry_volume` counts qualifying *rows* (visitor arrivals), not passengers,
/// and divides by [`POPULATION`]. An empty view gives all zeros.
pub fn totals(view: &FilteredView<'_>) -> Totals {
    let total_passengers = view
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.passenger_count));

    let visitor_arrivals = view
        .iter()
        .filter(|r| r.travel_type == TravelType::Arrival && r.passenger_origin.is_visitor())
        .count();

    Totals {
        total_passengers,
        entry_volume: round_to(visitor_arrivals as f64 / POPULATION, ENTRY_VOLUME_PRECISION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterSpec, apply};
    use crate::model::{Dataset, PassengerOrigin, PassengerRecord};
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Dataset::new(vec![
            PassengerRecord::new(d, "Airport", TravelType::Arrival, PassengerOrigin::MainlandVisitors, 100),
            PassengerRecord::new(d, "Airport", TravelType::Departure, PassengerOrigin::MainlandVisitors, 40),
            PassengerRecord::new(d, "Lo Wu", TravelType::Arrival, PassengerOrigin::HongKongResidents, 500),
            PassengerRecord::new(d, "Lo Wu", TravelType::Arrival, PassengerOrigin::OtherVisitors, 0),
        ])
    }

    #[test]
    fn test_totals_over_everything() {
        let ds = dataset();
        let t = totals(&ds.view_all());
        assert_eq!(t.total_passengers, 640);
        // two visitor arrival rows, the zero-count one included
        assert_eq!(t.entry_volume, round_to(2.0 / POPULATION, 8));
    }

    #[test]
    fn test_residents_do_not_count_as_entries() {
        let ds = dataset();
        let view = apply(&ds, &FilterSpec::default().with_control_points(["Lo Wu"]));
        let t = totals(&view);
        assert_eq!(t.total_passengers, 500);
        assert_eq!(t.entry_volume, round_to(1.0 / POPULATION, 8));
    }

    #[test]
    fn test_departures_only_has_no_entries() {
        let ds = dataset();
        let view = apply(
            &ds,
            &FilterSpec::default().with_travel_types([TravelType::Departure]),
        );
        let t = totals(&view);
        assert_eq!(t.total_passengers, 40);
        assert_eq!(t.entry_volume, 0.0);
    }

    #[test]
    fn test_empty_view_is_zero() {
        let t = totals(&FilteredView::default());
        assert_eq!(t, Totals::default());
        assert_eq!(t.total_passengers, 0);
        assert!(!t.entry_volume.is_nan());
    }

    #[test]
    fn test_total_saturates_on_huge_counts() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let ds = Dataset::new(vec![
            PassengerRecord::new(d, "Airport", TravelType::Arrival, PassengerOrigin::MainlandVisitors, u64::MAX),
            PassengerRecord::new(d, "Lo Wu", TravelType::Arrival, PassengerOrigin::MainlandVisitors, 10),
        ]);
        assert_eq!(totals(&ds.view_all()).total_passengers, u64::MAX);
    }
}
