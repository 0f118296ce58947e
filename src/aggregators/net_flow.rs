use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::aggregators::types::NetFlowPoint;
use crate::aggregators::utility::signed_difference;
use crate::filter::FilteredView;
use crate::model::{TravelType, normalize_control_point};

/// How net flow rows are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetFlowGrouping {
    /// One row per date, summed over every control point in the view.
    #[default]
    Date,
    /// One row per (date, control point). Names that differ only in case or
    /// spacing share a row, labelled with the first spelling seen.
    DateAndControlPoint,
}

#[derive(Default)]
struct Flow {
    arrivals: u64,
    departures: u64,
}

/// Arrivals minus departures per date (and optionally per control point),
/// summed across passenger origins. Sorted by date, then control point.
///
/// Which control points contribute is decided by the filter that produced
/// `view`; an empty view yields no rows.
pub fn net_flow(view: &FilteredView<'_>, grouping: NetFlowGrouping) -> Vec<NetFlowPoint> {
    let mut flows: BTreeMap<(NaiveDate, Option<String>), Flow> = BTreeMap::new();
    let mut labels: HashMap<String, &str> = HashMap::new();

    for record in view.iter() {
        let control_point = match grouping {
            NetFlowGrouping::Date => None,
            NetFlowGrouping::DateAndControlPoint => {
                let key = normalize_control_point(record.control_point());
                labels.entry(key.clone()).or_insert(record.control_point());
                Some(key)
            }
        };

        let flow = flows.entry((record.date, control_point)).or_default();
        match record.travel_type {
            TravelType::Arrival => {
                flow.arrivals = flow.arrivals.saturating_add(record.passenger_count)
            }
            TravelType::Departure => {
                flow.departures = flow.departures.saturating_add(record.passenger_count)
            }
        }
    }

    flows
        .into_iter()
        .map(|((date, key), flow)| NetFlowPoint {
            date,
            control_point: key.map(|k| labels.get(&k).map_or(k, |l| l.to_string())),
            arrivals: flow.arrivals,
            departures: flow.departures,
            difference: signed_difference(flow.arrivals, flow.departures),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::types::FlowDirection;
    use crate::filter::{FilterSpec, apply};
    use crate::model::{Dataset, PassengerOrigin, PassengerRecord};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn rec(d: u32, cp: &str, t: TravelType, o: PassengerOrigin, n: u64) -> PassengerRecord {
        PassengerRecord::new(date(d), cp, t, o, n)
    }

    fn dataset() -> Dataset {
        use PassengerOrigin::*;
        use TravelType::*;
        Dataset::new(vec![
            rec(2, "Lo Wu", Arrival, HongKongResidents, 30),
            rec(1, "Airport", Arrival, MainlandVisitors, 100),
            rec(1, "Airport", Departure, MainlandVisitors, 40),
            rec(1, "Airport", Arrival, OtherVisitors, 5),
            rec(1, "Lo Wu", Departure, HongKongResidents, 200),
            rec(2, "Airport", Departure, OtherVisitors, 10),
        ])
    }

    #[test]
    fn test_net_flow_by_date_sums_all_control_points() {
        let ds = dataset();
        let rows = net_flow(&ds.view_all(), NetFlowGrouping::Date);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(1));
        assert_eq!(rows[0].control_point, None);
        assert_eq!(rows[0].arrivals, 105);
        assert_eq!(rows[0].departures, 240);
        assert_eq!(rows[0].difference, -135);
        assert_eq!(rows[0].direction(), FlowDirection::Outflow);

        assert_eq!(rows[1].date, date(2));
        assert_eq!(rows[1].difference, 20);
        assert_eq!(rows[1].direction(), FlowDirection::Inflow);
    }

    #[test]
    fn test_net_flow_by_control_point() {
        let ds = dataset();
        let rows = net_flow(&ds.view_all(), NetFlowGrouping::DateAndControlPoint);

        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.date, r.control_point.as_deref().unwrap()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (date(1), "Airport"),
                (date(1), "Lo Wu"),
                (date(2), "Airport"),
                (date(2), "Lo Wu"),
            ]
        );
        assert_eq!(rows[0].arrivals, 105);
        assert_eq!(rows[0].departures, 40);
        assert_eq!(rows[0].difference, 65);
    }

    #[test]
    fn test_net_flow_merges_differently_spelled_control_points() {
        use PassengerOrigin::*;
        use TravelType::*;
        let ds = Dataset::new(vec![
            rec(1, "Lo Wu", Arrival, HongKongResidents, 5),
            rec(1, "lo  wu", Departure, HongKongResidents, 3),
        ]);
        assert_eq!(ds.control_points(), vec!["Lo Wu"]);

        let rows = net_flow(&ds.view_all(), NetFlowGrouping::DateAndControlPoint);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].control_point.as_deref(), Some("Lo Wu"));
        assert_eq!((rows[0].arrivals, rows[0].departures, rows[0].difference), (5, 3, 2));
    }

    #[test]
    fn test_net_flow_saturates_instead_of_overflowing() {
        use PassengerOrigin::*;
        use TravelType::*;
        let ds = Dataset::new(vec![
            rec(1, "Airport", Arrival, MainlandVisitors, u64::MAX),
            rec(1, "Airport", Arrival, OtherVisitors, 1),
        ]);
        let rows = net_flow(&ds.view_all(), NetFlowGrouping::Date);
        assert_eq!(rows[0].arrivals, u64::MAX);
        assert_eq!(rows[0].difference, i64::MAX);
    }

    #[test]
    fn test_net_flow_restricted_to_selected_control_points() {
        let ds = dataset();
        let view = apply(&ds, &FilterSpec::default().with_control_points(["Airport"]));
        let rows = net_flow(&view, NetFlowGrouping::Date);

        assert_eq!(rows[0].difference, 65);
        assert_eq!(rows[1].difference, -10);
    }

    #[test]
    fn test_zero_difference_is_inflow() {
        use PassengerOrigin::*;
        use TravelType::*;
        let ds = Dataset::new(vec![
            rec(1, "Airport", Arrival, MainlandVisitors, 7),
            rec(1, "Airport", Departure, MainlandVisitors, 7),
        ]);
        let rows = net_flow(&ds.view_all(), NetFlowGrouping::Date);
        assert_eq!(rows[0].difference, 0);
        assert_eq!(rows[0].direction(), FlowDirection::Inflow);
    }

    #[test]
    fn test_difference_sum_matches_totals() {
        let ds = dataset();
        let view = ds.view_all();
        let rows = net_flow(&view, NetFlowGrouping::DateAndControlPoint);

        let arrivals: i64 = view
            .iter()
            .filter(|r| r.travel_type == TravelType::Arrival)
            .map(|r| r.passenger_count as i64)
            .sum();
        let departures: i64 = view
            .iter()
            .filter(|r| r.travel_type == TravelType::Departure)
            .map(|r| r.passenger_count as i64)
            .sum();

        assert_eq!(
            rows.iter().map(|r| r.difference).sum::<i64>(),
            arrivals - departures
        );
    }

    #[test]
    fn test_empty_view_yields_no_rows() {
        let ds = dataset();
        let view = apply(
            &ds,
            &FilterSpec::default().with_dates(Some(date(20)), Some(date(25))),
        );
        assert!(net_flow(&view, NetFlowGrouping::Date).is_empty());
    }
}
