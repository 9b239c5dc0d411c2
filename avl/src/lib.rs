//! Reads and writes the points that feed trajectory assembly: delimited text in, delimited text or
//! GeoJSON out.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod export;
mod read;
mod write;

use std::collections::BTreeMap;

use model::PropertyKind;
use serde::{Deserialize, Serialize};

pub use export::{trajectories_to_geojson, trajectories_to_geojson_string};
pub use read::{read_points, sort_points};
pub use write::{write_points, write_trajectories};

/// Which columns hold what. Columns are referred to by their header name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub delimiter: char,
    pub object_id: String,
    pub timestamp: String,
    /// A `chrono` format string, used for the timestamp column and any timestamp properties
    pub timestamp_format: String,
    /// In order: x, y (and z), or longitude, latitude
    pub coordinates: Vec<String>,
    /// Extra columns to read as point properties, named after the column
    pub properties: BTreeMap<String, PropertyKind>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            delimiter: ',',
            object_id: "object_id".to_string(),
            timestamp: "timestamp".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            coordinates: vec!["longitude".to_string(), "latitude".to_string()],
            properties: BTreeMap::new(),
        }
    }
}

impl ColumnMapping {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).map_err(|err| anyhow!("Bad column mapping: {err}"))
    }

    fn delimiter_byte(&self) -> anyhow::Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter {:?} isn't a single byte", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}
