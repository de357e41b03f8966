use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing board config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host-supplied board properties.
///
/// Time values are `HH:MM` strings and ranges are `["HH:MM", "HH:MM"]`
/// pairs; malformed times are rejected while deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub mode: WorkMode,
    pub selected_date: NaiveDate,
    /// Start and end of the current selection as shown by the host; may hold
    /// empty strings.
    #[serde(default = "default_selected_times")]
    pub selected_times: Vec<String>,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    /// Slot length in minutes. Non-positive values produce an empty day.
    #[serde(default = "default_interval")]
    pub interval: i32,
    /// Row height in layout units.
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub occupied: Vec<TimeRange>,
    #[serde(default)]
    pub invalid: Vec<TimeRange>,
}

fn default_selected_times() -> Vec<String> {
    vec![String::new(), String::new()]
}

fn default_interval() -> i32 {
    30
}

fn default_height() -> f64 {
    60.0
}

impl BoardConfig {
    /// A config with defaults for everything but the date and day bounds.
    pub fn new(selected_date: NaiveDate, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            mode: WorkMode::default(),
            selected_date,
            selected_times: default_selected_times(),
            start_time,
            end_time,
            interval: default_interval(),
            height: default_height(),
            occupied: Vec::new(),
            invalid: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
