//! The shared filter applied before every aggregation.
//!
//! An empty selection on any dimension means "do not filter on it".

use std::collections::HashSet;
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::model::{Dataset, PassengerRecord, TravelType, normalize_control_point};

/// Sentinel accepted in place of an explicit list.
pub const ALL_SENTINEL: &str = "all";

/// A set of accepted values for one filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(Vec<T>),
}

impl<T> Selection<T> {
    /// Builds a selection, collapsing an empty list to [`Selection::All`].
    pub fn only(items: impl IntoIterator<Item = T>) -> Self {
        let items: Vec<T> = items.into_iter().collect();
        if items.is_empty() {
            Selection::All
        } else {
            Selection::Only(items)
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(items) => items.is_empty(),
        }
    }
}

impl<T: Eq + Hash + Clone> Selection<T> {
    fn to_set(&self) -> Option<HashSet<T>> {
        match self {
            Selection::Only(items) if !items.is_empty() => Some(items.iter().cloned().collect()),
            _ => None,
        }
    }
}

impl Selection<String> {
    /// Parses raw user input. An empty list or any `"all"` entry selects everything.
    pub fn from_args(values: &[String]) -> Self {
        if values
            .iter()
            .any(|v| v.trim().eq_ignore_ascii_case(ALL_SENTINEL))
        {
            return Selection::All;
        }
        Selection::only(
            values
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        )
    }
}

/// Inclusive date bounds. A missing bound falls back to the dataset's min or max.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Fills missing bounds from `bounds`. `None` when there is nothing to fill from.
    pub fn resolve(&self, bounds: Option<(NaiveDate, NaiveDate)>) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end, bounds) {
            (Some(start), Some(end), _) => Some((start, end)),
            (start, end, Some((min, max))) => Some((start.unwrap_or(min), end.unwrap_or(max))),
            _ => None,
        }
    }
}

/// The full filter shared by every dashboard view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub date_range: DateRange,
    pub control_points: Selection<String>,
    pub travel_types: Selection<TravelType>,
}

impl FilterSpec {
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    pub fn with_control_points<S: Into<String>>(
        mut self,
        control_points: impl IntoIterator<Item = S>,
    ) -> Self {
        self.control_points = Selection::only(control_points.into_iter().map(Into::into));
        self
    }

    pub fn with_travel_types(mut self, travel_types: impl IntoIterator<Item = TravelType>) -> Self {
        self.travel_types = Selection::only(travel_types);
        self
    }
}

/// Borrowed subset of a [`Dataset`] produced by [`apply`].
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a PassengerRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn new(records: Vec<&'a PassengerRecord>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PassengerRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Applies `spec` to `dataset` without touching it.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredView<'a> {
    let Some((start, end)) = spec.date_range.resolve(dataset.date_bounds()) else {
        return FilteredView::default();
    };

    let control_points: Option<HashSet<String>> = match &spec.control_points {
        Selection::Only(names) if !names.is_empty() => {
            Some(names.iter().map(|n| normalize_control_point(n)).collect())
        }
        _ => None,
    };
    let travel_types = spec.travel_types.to_set();

    let records: Vec<&PassengerRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .filter(|r| {
            control_points
                .as_ref()
                .is_none_or(|set| set.contains(&normalize_control_point(r.control_point())))
        })
        .filter(|r| {
            travel_types
                .as_ref()
                .is_none_or(|set| set.contains(&r.travel_type))
        })
        .collect();

    debug!(
        start = %start,
        end = %end,
        matched = records.len(),
        total = dataset.len(),
        "Filter applied"
    );

    FilteredView::new(records)
}
