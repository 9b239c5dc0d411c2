//! Distance, length and bearing for points and trajectories, in the units of the coordinate
//! system (meters for `Terrestrial`).

use crate::point::nanoseconds;
use crate::{CoordinateSystem, Point, Trajectory};

pub fn distance<C: CoordinateSystem>(a: &Point<C>, b: &Point<C>) -> f64 {
    C::distance(&a.coords, &b.coords)
}

/// Total distance along all of the points. Zero for fewer than 2 points.
pub fn length<C: CoordinateSystem>(trajectory: &Trajectory<C>) -> f64 {
    trajectory
        .points()
        .windows(2)
        .map(|pair| distance(&pair[0], &pair[1]))
        .sum()
}

/// Distance travelled up to and including each point, starting with 0.
pub fn cumulative_lengths<C: CoordinateSystem>(points: &[Point<C>]) -> Vec<f64> {
    let mut result = Vec::with_capacity(points.len());
    let mut so_far = 0.0;
    for (idx, pt) in points.iter().enumerate() {
        if idx > 0 {
            so_far += distance(&points[idx - 1], pt);
        }
        result.push(so_far);
    }
    result
}

/// Degrees clockwise from north, in [0, 360).
pub fn bearing<C: CoordinateSystem>(a: &Point<C>, b: &Point<C>) -> f64 {
    C::bearing(&a.coords, &b.coords)
}

/// Distance units per second. None if the points share a timestamp.
pub fn speed_between<C: CoordinateSystem>(a: &Point<C>, b: &Point<C>) -> Option<f64> {
    let secs = nanoseconds(b.timestamp - a.timestamp) / 1e9;
    if secs == 0.0 {
        return None;
    }
    Some(distance(a, b) / secs.abs())
}
