//! The loaded dashboard state and the snapshot of every view for one filter.
//!
//! A [`Dashboard`] is built once; each filter change produces a new
//! [`DashboardSnapshot`] without touching the loaded tables, so snapshots can
//! be computed from several threads at once.

use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregators::types::{CategoryCount, GeoMarker, NetFlowPoint, Totals};
use crate::aggregators::{
    NetFlowGrouping, geo_markers, net_flow, passenger_origin_sums, totals, travel_method_sums,
};
use crate::error::LoadError;
use crate::filter::{self, FilterSpec};
use crate::loader;
use crate::locations::{self, MAP_CENTER, MAP_ZOOM};
use crate::model::{ControlPointLocation, Dataset, PassengerOrigin, TravelMethod, TravelType};

/// Length of the window selected when the dashboard opens.
pub const DEFAULT_WINDOW_DAYS: u64 = 15;

pub struct Dashboard {
    dataset: Dataset,
    locations: Vec<ControlPointLocation>,
}

/// Everything the presentation layer renders for one filter.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub filter: FilterSpec,
    /// The inclusive date range actually applied, after filling missing bounds.
    pub resolved_range: Option<(NaiveDate, NaiveDate)>,
    pub matched_rows: usize,
    pub totals: Totals,
    pub net_flow: Vec<NetFlowPoint>,
    pub passenger_origins: Vec<CategoryCount<PassengerOrigin>>,
    pub travel_methods: Vec<CategoryCount<TravelMethod>>,
    pub map: MapView,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<GeoMarker>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, locations: Vec<ControlPointLocation>) -> Self {
        Self { dataset, locations }
    }

    /// Loads both tables. When `locations_path` does not exist the built-in
    /// coordinate table is used instead.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if either file is unreadable or structurally invalid.
    pub fn load(data_path: &Path, locations_path: &Path) -> Result<Self, LoadError> {
        let dataset = loader::load_dataset(data_path)?;

        let locations = if locations_path.exists() {
            loader::load_locations(locations_path)?
        } else {
            info!(
                path = %locations_path.display(),
                "Location table not found, using built-in coordinates"
            );
            locations::builtin()
        };

        Ok(Self::new(dataset, locations))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn locations(&self) -> &[ControlPointLocation] {
        &self.locations
    }

    /// Control points offered in the selector, in order of first appearance.
    pub fn control_point_options(&self) -> Vec<&str> {
        self.dataset.control_points()
    }

    /// The last [`DEFAULT_WINDOW_DAYS`] days up to the latest date, both directions.
    pub fn default_filter(&self) -> FilterSpec {
        let spec = FilterSpec::default().with_travel_types(TravelType::ALL);

        match self.dataset.date_bounds() {
            Some((_, last)) => {
                let start = last.checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS));
                spec.with_dates(start, Some(last))
            }
            None => spec,
        }
    }

    /// Runs the filter once and every aggregator over the result.
    pub fn snapshot(&self, spec: &FilterSpec, grouping: NetFlowGrouping) -> DashboardSnapshot {
        let view = filter::apply(&self.dataset, spec);
        debug!(matched = view.len(), "Computing dashboard snapshot");

        DashboardSnapshot {
            filter: spec.clone(),
            resolved_range: spec.date_range.resolve(self.dataset.date_bounds()),
            matched_rows: view.len(),
            totals: totals(&view),
            net_flow: net_flow(&view, grouping),
            passenger_origins: passenger_origin_sums(&view),
            travel_methods: travel_method_sums(&view),
            map: MapView {
                center: MAP_CENTER,
                zoom: MAP_ZOOM,
                markers: geo_markers(&view, &self.locations),
            },
        }
    }
}
