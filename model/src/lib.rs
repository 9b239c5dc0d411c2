//! Assembles timestamped points into trajectories, then treats each trajectory as a continuous
//! function of time or distance travelled: interpolating points, cutting out time windows, and
//! simplifying the shape.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub mod annotate;
mod assemble;
mod coords;
pub mod geometry;
mod interpolate;
mod point;
mod properties;
mod query;
mod simplify;
#[cfg(test)]
mod test_util;
mod trajectory;

pub use self::assemble::{
    assemble, clean_trajectories, remove_bad_points, split_on_gaps, AssembleIter, Assembler,
    AssemblyConfig, BadPointFilter,
};
pub use self::coords::{Cartesian2D, Cartesian3D, CoordinateSystem, Terrestrial};
pub use self::interpolate::{extrapolate, interpolate, Interpolate};
pub use self::point::{beginning_of_time, is_beginning_of_time, Point};
pub use self::properties::{PropertyKind, PropertyMap, PropertyValue};
pub use self::query::{
    classify_window, point_at_length_fraction, point_at_time, point_at_time_fraction,
    subset_during_interval, time_at_fraction, WindowOverlap,
};
pub use self::simplify::{simplify, simplify_points};
pub use self::trajectory::{Trajectory, EMPTY_ID};
