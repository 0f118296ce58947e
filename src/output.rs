//! Output formatting and persistence for dashboard results.
//!
//! Supports pretty-printing, JSON (optionally gzip-compressed) and CSV files.

use std::fmt::Debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("creating {}", path.display()))
}

/// Writes `value` as pretty JSON to `path`, gzip-compressed when `gzip` is set.
pub fn write_json<T: Serialize>(path: &Path, value: &T, gzip: bool) -> Result<()> {
    let file = BufWriter::new(create(path)?);

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        serde_json::to_writer_pretty(&mut encoder, value)?;
        encoder.finish()?.flush()?;
    } else {
        let mut file = file;
        serde_json::to_writer_pretty(&mut file, value)?;
        file.flush()?;
    }

    debug!(path = %path.display(), gzip, "JSON written");
    Ok(())
}

/// Writes `rows` to a fresh CSV file at `path` with a header row.
/// Returns the number of data rows written.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_writer(create(path)?);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(rows.len())
}
