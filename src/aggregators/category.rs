use std::collections::HashMap;
use std::hash::Hash;

use crate::aggregators::types::CategoryCount;
use crate::filter::FilteredView;
use crate::model::{PassengerOrigin, PassengerRecord, TravelMethod};

/// A categorical column with a fixed chart order.
pub trait Category: Copy + Eq + Hash + 'static {
    const DISPLAY_ORDER: &'static [Self];

    fn of(record: &PassengerRecord) -> Self;
}

impl Category for PassengerOrigin {
    const DISPLAY_ORDER: &'static [Self] = &PassengerOrigin::ALL;

    fn of(record: &PassengerRecord) -> Self {
        record.passenger_origin
    }
}

impl Category for TravelMethod {
    const DISPLAY_ORDER: &'static [Self] = &TravelMethod::ALL;

    fn of(record: &PassengerRecord) -> Self {
        record.travel_method()
    }
}

/// Sums passenger counts per category of `C`, in `C`'s display order.
pub fn group_sum<C: Category>(view: &FilteredView<'_>) -> Vec<CategoryCount<C>> {
    group_sum_by(view, C::of, C::DISPLAY_ORDER)
}

/// Sums passenger counts keyed by `key`, emitted in `order`.
///
/// Categories with no rows in the view are omitted, as are keys missing
/// from `order`. Input row order never affects the output.
pub fn group_sum_by<C, F>(view: &FilteredView<'_>, key: F, order: &[C]) -> Vec<CategoryCount<C>>
where
    C: Copy + Eq + Hash,
    F: Fn(&PassengerRecord) -> C,
{
    let mut sums: HashMap<C, u64> = HashMap::new();
    for record in view.iter() {
        let sum = sums.entry(key(record)).or_default();
        *sum = sum.saturating_add(record.passenger_count);
    }

    order
        .iter()
        .filter_map(|category| {
            sums.get(category).map(|&passenger_count| CategoryCount {
                category: *category,
                passenger_count,
            })
        })
        .collect()
}

/// Passenger counts by origin: residents, mainland visitors, other visitors.
pub fn passenger_origin_sums(view: &FilteredView<'_>) -> Vec<CategoryCount<PassengerOrigin>> {
    group_sum(view)
}

/// Passenger counts by travel method: land, air, sea.
pub fn travel_method_sums(view: &FilteredView<'_>) -> Vec<CategoryCount<TravelMethod>> {
    group_sum(view)
}
