//! CSV loading for the processed passenger table and the location table.
//!
//! Rows with unusable values are dropped with a warning. Missing columns are
//! fatal because no aggregate over such a table can be trusted.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::model::{ControlPointLocation, Dataset, PassengerRecord};

/// Day-month-year, as published by the immigration department.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const PASSENGER_COLUMNS: [&str; 5] = [
    "date",
    "control_point",
    "travel_type",
    "passenger_origin",
    "passenger_count",
];

const LOCATION_COLUMNS: [&str; 3] = ["control_point", "latitude", "longitude"];

/// Header name to column position, matched case-insensitively.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        Self(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), i))
                .collect(),
        )
    }

    fn require(&self, label: &str, names: &[&str]) -> Result<Vec<usize>, LoadError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.0.contains_key(**n))
            .map(|n| n.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                path: label.to_string(),
                missing,
            });
        }

        Ok(names.iter().map(|n| self.0[*n]).collect())
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parses a `dd-mm-yyyy` date, tolerating surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses a non-negative passenger count. Accepts integral floats like `"120.0"`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }

    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Loads the processed passenger table from `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or lacks a required column.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let records = read_records(open(path)?, &path.display().to_string())?;
    Ok(Dataset::new(records))
}

/// Reads passenger records from any CSV source. `label` only appears in logs and errors.
pub fn read_records<R: Read>(source: R, label: &str) -> Result<Vec<PassengerRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let columns = Columns::from_headers(rdr.headers()?);
    let idx = columns.require(label, &PASSENGER_COLUMNS)?;
    let (date_i, cp_i, type_i, origin_i, count_i) = (idx[0], idx[1], idx[2], idx[3], idx[4]);
    let method_i = columns.optional("travel_method");

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut method_mismatches = 0usize;

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());
        let field = |i: usize| row.get(i).unwrap_or("");

        let Some(date) = parse_date(field(date_i)) else {
            warn!(line, value = field(date_i), "Dropping row with unparseable date");
            dropped += 1;
            continue;
        };

        let control_point = field(cp_i).trim();
        if control_point.is_empty() {
            warn!(line, "Dropping row with empty control point");
            dropped += 1;
            continue;
        }

        let travel_type = match field(type_i).parse() {
            Ok(t) => t,
            Err(e) => {
                warn!(line, error = %e, "Dropping row");
                dropped += 1;
                continue;
            }
        };

        let passenger_origin = match field(origin_i).parse() {
            Ok(o) => o,
            Err(e) => {
                warn!(line, error = %e, "Dropping row");
                dropped += 1;
                continue;
            }
        };

        let Some(passenger_count) = parse_count(field(count_i)) else {
            warn!(line, value = field(count_i), "Dropping row with invalid passenger count");
            dropped += 1;
            continue;
        };

        let record = PassengerRecord::new(
            date,
            control_point,
            travel_type,
            passenger_origin,
            passenger_count,
        );

        if let Some(i) = method_i {
            let stored = field(i).trim();
            if !stored.is_empty() && stored != record.travel_method().as_str() {
                debug!(
                    line,
                    stored,
                    derived = %record.travel_method(),
                    "Stored travel method disagrees with control point, using derived"
                );
                method_mismatches += 1;
            }
        }

        records.push(record);
    }

    if method_mismatches > 0 {
        warn!(
            source = label,
            method_mismatches, "Replaced stored travel methods that disagreed with the mapping"
        );
    }

    info!(source = label, kept = records.len(), dropped, "Passenger table loaded");
    Ok(records)
}

/// Loads the control point coordinate table from `path`.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or lacks a required column.
pub fn load_locations(path: impl AsRef<Path>) -> Result<Vec<ControlPointLocation>, LoadError> {
    let path = path.as_ref();
    read_locations(open(path)?, &path.display().to_string())
}

/// Reads control point coordinates from any CSV source.
pub fn read_locations<R: Read>(
    source: R,
    label: &str,
) -> Result<Vec<ControlPointLocation>, LoadError> {
    let mut rdr = csv::Reader::from_reader(source);
    let columns = Columns::from_headers(rdr.headers()?);
    let idx = columns.require(label, &LOCATION_COLUMNS)?;

    let mut locations = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());
        let field = |i: usize| row.get(i).unwrap_or("").trim();

        let control_point = field(idx[0]);
        let latitude = field(idx[1]).parse::<f64>();
        let longitude = field(idx[2]).parse::<f64>();

        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) if !control_point.is_empty() => {
                locations.push(ControlPointLocation {
                    control_point: control_point.to_string(),
                    latitude,
                    longitude,
                });
            }
            _ => warn!(line, control_point, "Dropping location row with invalid coordinates"),
        }
    }

    debug!(source = label, count = locations.len(), "Location table loaded");
    Ok(locations)
}
