//! Derived per-point measurements, stored as real-valued point properties so they survive
//! slicing, interpolation and export like any other property.

use crate::geometry::{bearing, cumulative_lengths, speed_between};
use crate::point::nanoseconds;
use crate::{CoordinateSystem, Trajectory};

pub const LENGTH: &str = "length";
pub const LENGTH_FRACTION: &str = "length_fraction";
pub const TIME_FRACTION: &str = "time_fraction";
pub const SPEED: &str = "speed";
pub const HEADING: &str = "heading";

/// Distance travelled so far at each point.
pub fn current_length<C: CoordinateSystem>(trajectory: &mut Trajectory<C>) {
    let lengths = cumulative_lengths(trajectory.points());
    for (pt, length) in trajectory.points_mut().zip(lengths) {
        pt.properties.set(LENGTH, length);
    }
}

/// Fraction of the total length travelled so far at each point. All zeros if the object never
/// moves.
pub fn current_length_fraction<C: CoordinateSystem>(trajectory: &mut Trajectory<C>) {
    let lengths = cumulative_lengths(trajectory.points());
    let total = lengths.last().cloned().unwrap_or(0.0);
    for (pt, length) in trajectory.points_mut().zip(lengths) {
        let fraction = if total == 0.0 { 0.0 } else { length / total };
        pt.properties.set(LENGTH_FRACTION, fraction);
    }
}

/// Fraction of the total duration elapsed at each point. All zeros for an instantaneous
/// trajectory.
pub fn current_time_fraction<C: CoordinateSystem>(trajectory: &mut Trajectory<C>) {
    let start = trajectory.start_time();
    let total = nanoseconds(trajectory.duration());
    for pt in trajectory.points_mut() {
        let fraction = if total == 0.0 {
            0.0
        } else {
            nanoseconds(pt.timestamp - start) / total
        };
        pt.properties.set(TIME_FRACTION, fraction);
    }
}

/// Speed arriving at each point from the previous one, in distance units per second. The first
/// point copies the second's, and points sharing a timestamp with their predecessor repeat the
/// previous speed.
pub fn current_speed<C: CoordinateSystem>(trajectory: &mut Trajectory<C>) {
    let mut speeds = vec![0.0; trajectory.len()];
    for idx in 1..trajectory.len() {
        speeds[idx] = speed_between(&trajectory[idx - 1], &trajectory[idx])
            .unwrap_or(speeds[idx - 1]);
    }
    if speeds.len() > 1 {
        speeds[0] = speeds[1];
    }
    for (pt, speed) in trajectory.points_mut().zip(speeds) {
        pt.properties.set(SPEED, speed);
    }
}

/// Bearing from each point to the next. The last point repeats the previous heading.
pub fn current_heading<C: CoordinateSystem>(trajectory: &mut Trajectory<C>) {
    let mut headings = vec![0.0; trajectory.len()];
    for idx in 0..trajectory.len().saturating_sub(1) {
        headings[idx] = bearing(&trajectory[idx], &trajectory[idx + 1]);
    }
    if headings.len() > 1 {
        let n = headings.len();
        headings[n - 1] = headings[n - 2];
    }
    for (pt, heading) in trajectory.points_mut().zip(headings) {
        pt.properties.set(HEADING, heading);
    }
}

pub fn annotate_all<C: CoordinateSystem>(trajectory: &mut Trajectory<C>) {
    current_length(trajectory);
    current_length_fraction(trajectory);
    current_time_fraction(trajectory);
    current_speed(trajectory);
    current_heading(trajectory);
}
