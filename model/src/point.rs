use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{CoordinateSystem, PropertyMap};

/// Marks a timestamp as not available. Queries on empty trajectories return this.
pub fn beginning_of_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1400, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

pub fn is_beginning_of_time(ts: NaiveDateTime) -> bool {
    ts == beginning_of_time()
}

/// Full precision for spans up to about 292 years, milliseconds beyond that.
pub(crate) fn nanoseconds(duration: Duration) -> f64 {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64)
        .unwrap_or_else(|| duration.num_milliseconds() as f64 * 1e6)
}

/// One observation of a moving object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Point<C: CoordinateSystem> {
    pub coords: C::Coords,
    /// Empty when unknown
    pub object_id: String,
    pub timestamp: NaiveDateTime,
    pub properties: PropertyMap,
}

impl<C: CoordinateSystem> Point<C> {
    pub fn new(coords: C::Coords) -> Self {
        Self {
            coords,
            object_id: String::new(),
            timestamp: beginning_of_time(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_object_id(mut self, object_id: &str) -> Self {
        self.object_id = object_id.to_string();
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_property<V: Into<crate::PropertyValue>>(mut self, name: &str, value: V) -> Self {
        self.properties.set(name, value);
        self
    }

    /// None past the coordinate system's dimension.
    pub fn coord(&self, idx: usize) -> Option<f64> {
        self.coords.as_ref().get(idx).cloned()
    }

    pub fn has_timestamp(&self) -> bool {
        !is_beginning_of_time(self.timestamp)
    }
}

impl<C: CoordinateSystem> Default for Point<C> {
    fn default() -> Self {
        Self::new(C::Coords::default())
    }
}
