//! Reshapes the raw immigration feed into the processed long table.
//!
//! The raw feed has one row per (date, control point, direction) and one
//! column per passenger origin. The processed table has one row per origin.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::loader::parse_count;
use crate::model::PassengerOrigin;
use crate::travel_method::classify;

const RAW_DATE: &str = "Date";
const RAW_CONTROL_POINT: &str = "Control Point";
const RAW_TRAVEL_TYPE: &str = "Arrival / Departure";

/// A row of the processed table, in the column order the loader expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedRow {
    pub date: String,
    pub control_point: String,
    pub travel_type: String,
    pub passenger_origin: PassengerOrigin,
    pub passenger_count: Option<u64>,
    pub travel_method: &'static str,
}

/// Melts the raw feed. Rows come out grouped by origin, then in feed order.
///
/// Dates are passed through untouched; validating them is the loader's job.
///
/// # Errors
///
/// Fails if the CSV cannot be read or an expected column is missing.
pub fn melt_raw<R: Read>(source: R) -> Result<Vec<ProcessedRow>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let mut wanted = vec![RAW_DATE, RAW_CONTROL_POINT, RAW_TRAVEL_TYPE];
    wanted.extend(PassengerOrigin::ALL.iter().map(PassengerOrigin::as_str));

    let missing: Vec<String> = wanted
        .iter()
        .filter(|name| position(*name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: "raw feed".to_string(),
            missing,
        }
        .into());
    }

    let column = |name: &str| position(name).unwrap_or_default();
    let (date_i, cp_i, type_i) = (
        column(RAW_DATE),
        column(RAW_CONTROL_POINT),
        column(RAW_TRAVEL_TYPE),
    );
    let origin_columns: Vec<(PassengerOrigin, usize)> = PassengerOrigin::ALL
        .iter()
        .map(|o| (*o, column(o.as_str())))
        .collect();

    let raw_rows: Vec<csv::StringRecord> = rdr
        .records()
        .collect::<Result<_, _>>()
        .context("reading raw feed rows")?;
    debug!(rows = raw_rows.len(), "Raw feed read");

    let mut rows = Vec::with_capacity(raw_rows.len() * origin_columns.len());
    for (origin, origin_i) in origin_columns {
        for raw in &raw_rows {
            let field = |i: usize| raw.get(i).unwrap_or("").trim();
            let control_point = field(cp_i).to_string();
            let travel_method = classify(&control_point).as_str();
            rows.push(ProcessedRow {
                date: field(date_i).to_string(),
                travel_type: field(type_i).to_string(),
                passenger_origin: origin,
                passenger_count: parse_count(field(origin_i)),
                travel_method,
                control_point,
            });
        }
    }

    info!(raw = raw_rows.len(), processed = rows.len(), "Raw feed melted");
    Ok(rows)
}
