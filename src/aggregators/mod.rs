//! Aggregations over a filtered view of the passenger table.
//!
//! Each aggregator takes the same [`FilteredView`](crate::filter::FilteredView)
//! and returns a fresh value. None of them depend on each other, and every one
//! has a defined result for an empty view.

pub mod category;
pub mod geo;
pub mod net_flow;
pub mod summary;
pub mod types;
pub mod utility;

pub use category::{group_sum, group_sum_by, passenger_origin_sums, travel_method_sums};
pub use geo::geo_markers;
pub use net_flow::{NetFlowGrouping, net_flow};
pub use summary::totals;
