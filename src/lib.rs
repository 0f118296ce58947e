//! Hong Kong cross-border passenger traffic: loading, filtering and the
//! aggregations behind the traffic dashboard.

pub mod aggregators;
pub mod clean;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod loader;
pub mod locations;
pub mod model;
pub mod output;
pub mod travel_method;
