// Turns streams of points into trajectories, splitting wherever an object goes quiet for too long
// or jumps too far.

mod clean;
mod gaps;
mod stream;

use chrono::Duration;

use crate::{geometry, CoordinateSystem, Point};

pub use clean::{clean_trajectories, remove_bad_points, BadPointFilter};
pub use gaps::{assemble, split_on_gaps};
pub use stream::{AssembleIter, Assembler};

#[derive(Clone, Debug)]
pub struct AssemblyConfig {
    /// Consecutive points at least this far apart in time start a new trajectory.
    pub separation_time: Duration,
    /// Consecutive points at least this far apart in space start a new trajectory. Units are the
    /// coordinate system's.
    pub separation_distance: Option<f64>,
    /// Runs with fewer points are dropped.
    pub minimum_length: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            separation_time: Duration::minutes(20),
            separation_distance: None,
            minimum_length: 2,
        }
    }
}

impl AssemblyConfig {
    pub fn is_apart<C: CoordinateSystem>(&self, before: &Point<C>, after: &Point<C>) -> bool {
        if after.timestamp - before.timestamp >= self.separation_time {
            return true;
        }
        if let Some(max) = self.separation_distance {
            if geometry::distance(before, after) >= max {
                return true;
            }
        }
        false
    }
}
