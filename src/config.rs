//! Runtime settings, read from the environment (after `.env` is loaded).

use std::path::PathBuf;

use crate::fetch::DEFAULT_SOURCE_URL;

pub const DEFAULT_DATA_PATH: &str = "data/processed/data.csv";
pub const DEFAULT_LOCATIONS_PATH: &str = "data/processed/control_points_hk.csv";
pub const DEFAULT_RAW_PATH: &str = "data/raw/data.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/hk_passenger_tracker.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Processed long-format passenger table.
    pub data_path: PathBuf,
    /// Control point coordinate table. Falls back to the built-in table when absent.
    pub locations_path: PathBuf,
    /// Where `fetch` stores the raw feed and `clean` reads it from.
    pub raw_path: PathBuf,
    pub source_url: String,
    pub log_file_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.into(),
            locations_path: DEFAULT_LOCATIONS_PATH.into(),
            raw_path: DEFAULT_RAW_PATH.into(),
            source_url: DEFAULT_SOURCE_URL.into(),
            log_file_path: DEFAULT_LOG_FILE_PATH.into(),
        }
    }
}

impl Settings {
    /// Reads `DATA_PATH`, `LOCATIONS_PATH`, `RAW_DATA_PATH`, `SOURCE_URL` and
    /// `LOG_FILE_PATH`, keeping defaults for anything unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(v) = var("DATA_PATH") {
            settings.data_path = v.into();
        }
        if let Some(v) = var("LOCATIONS_PATH") {
            settings.locations_path = v.into();
        }
        if let Some(v) = var("RAW_DATA_PATH") {
            settings.raw_path = v.into();
        }
        if let Some(v) = var("SOURCE_URL") {
            settings.source_url = v;
        }
        if let Some(v) = var("LOG_FILE_PATH") {
            settings.log_file_path = v.into();
        }

        settings
    }
}
