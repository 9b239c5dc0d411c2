use chrono::NaiveDateTime;

use crate::geometry::cumulative_lengths;
use crate::point::nanoseconds;
use crate::{beginning_of_time, interpolate, CoordinateSystem, Point, Trajectory};

/// Where a time window falls relative to a trajectory's time span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowOverlap {
    /// The trajectory has no points.
    Empty,
    /// The window ends before the trajectory starts.
    Before,
    /// The window starts after the trajectory ends.
    After,
    /// The window covers the trajectory's start, but ends partway through.
    Prefix,
    /// The window starts partway through and covers the trajectory's end.
    Suffix,
    /// The window lies strictly inside the trajectory.
    Interior,
    /// The window covers the whole trajectory.
    Containing,
}

/// The trajectory's position at some time. Times before the start or after the end get the first
/// or last point. An empty trajectory produces `Point::default()`, whose timestamp is the
/// beginning of time and whose coordinates are meaningless.
pub fn point_at_time<C: CoordinateSystem>(
    trajectory: &Trajectory<C>,
    time: NaiveDateTime,
) -> Point<C> {
    let points = trajectory.points();
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Point::default(),
    };
    if time <= first.timestamp {
        return first.clone();
    }
    if time >= last.timestamp {
        return last.clone();
    }

    // first <= time < last, so this is in [1, len)
    let idx = points.partition_point(|pt| pt.timestamp <= time);
    let before = &points[idx - 1];
    let after = &points[idx];
    if before.timestamp == time {
        return before.clone();
    }
    interpolate(before, after, time_fraction_between(before, after, time))
}

fn time_fraction_between<C: CoordinateSystem>(
    before: &Point<C>,
    after: &Point<C>,
    time: NaiveDateTime,
) -> f64 {
    let span = nanoseconds(after.timestamp - before.timestamp);
    // Equal timestamps mean we're exactly at the first point
    if span == 0.0 {
        return 0.0;
    }
    nanoseconds(time - before.timestamp) / span
}

/// `fraction` of the way through the trajectory's duration, saturating at the start and end. The
/// beginning of time for an empty trajectory.
pub fn time_at_fraction<C: CoordinateSystem>(
    trajectory: &Trajectory<C>,
    fraction: f64,
) -> NaiveDateTime {
    if trajectory.is_empty() {
        return beginning_of_time();
    }
    if fraction.is_nan() || fraction <= 0.0 {
        return trajectory.start_time();
    }
    if fraction >= 1.0 {
        return trajectory.end_time();
    }
    interpolate(&trajectory.start_time(), &trajectory.end_time(), fraction)
}

pub fn point_at_time_fraction<C: CoordinateSystem>(
    trajectory: &Trajectory<C>,
    fraction: f64,
) -> Point<C> {
    point_at_time(trajectory, time_at_fraction(trajectory, fraction))
}

/// The point `fraction` of the way along the trajectory's length. Timestamps and properties are
/// interpolated along with the position, so the result only approximately agrees with
/// `point_at_time_fraction`.
pub fn point_at_length_fraction<C: CoordinateSystem>(
    trajectory: &Trajectory<C>,
    fraction: f64,
) -> Point<C> {
    let points = trajectory.points();
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Point::default(),
    };
    if fraction.is_nan() || fraction <= 0.0 {
        return first.clone();
    }
    if fraction >= 1.0 {
        return last.clone();
    }

    let cumulative = cumulative_lengths(points);
    let total = cumulative[cumulative.len() - 1];
    // The object never moved
    if total == 0.0 {
        return first.clone();
    }
    let target = fraction * total;
    // cumulative[0] is 0 <= target < total, so this is in [1, len)
    let idx = cumulative.partition_point(|dist| *dist <= target);
    let before = idx - 1;
    if cumulative[before] == target {
        return points[before].clone();
    }
    let segment = cumulative[idx] - cumulative[before];
    interpolate(
        &points[before],
        &points[idx],
        (target - cumulative[before]) / segment,
    )
}

/// Classifies a window; `start` and `end` may be given in either order.
pub fn classify_window<C: CoordinateSystem>(
    trajectory: &Trajectory<C>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> WindowOverlap {
    let (start, end) = ordered(start, end);
    if trajectory.is_empty() {
        return WindowOverlap::Empty;
    }
    let t0 = trajectory.start_time();
    let t1 = trajectory.end_time();
    if end < t0 {
        WindowOverlap::Before
    } else if start > t1 {
        WindowOverlap::After
    } else if start <= t0 && end >= t1 {
        WindowOverlap::Containing
    } else if start <= t0 {
        WindowOverlap::Prefix
    } else if end >= t1 {
        WindowOverlap::Suffix
    } else {
        WindowOverlap::Interior
    }
}

/// The part of the trajectory between two times, with the trajectory's properties. Points inside
/// the window are copied as-is. If the window cuts between two points, an interpolated point is
/// added exactly at that boundary. Windows missing the trajectory entirely produce no points.
pub fn subset_during_interval<C: CoordinateSystem>(
    trajectory: &Trajectory<C>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Trajectory<C> {
    match classify_window(trajectory, start, end) {
        WindowOverlap::Empty | WindowOverlap::Before | WindowOverlap::After => {
            return trajectory.with_points_like(Vec::new());
        }
        _ => {}
    }

    let (start, end) = ordered(start, end);
    let start = start.max(trajectory.start_time());
    let end = end.min(trajectory.end_time());
    if start == end {
        return trajectory.with_points_like(vec![point_at_time(trajectory, start)]);
    }

    let points = trajectory.points();
    let lo = points.partition_point(|pt| pt.timestamp < start);
    let hi = points.partition_point(|pt| pt.timestamp <= end);
    let inside = &points[lo..hi];

    let mut result = Vec::with_capacity(inside.len() + 2);
    if inside.first().map(|pt| pt.timestamp != start).unwrap_or(true) {
        result.push(point_at_time(trajectory, start));
    }
    result.extend_from_slice(inside);
    if inside.last().map(|pt| pt.timestamp != end).unwrap_or(true) {
        result.push(point_at_time(trajectory, end));
    }
    trajectory.with_points_like(result)
}

fn ordered(a: NaiveDateTime, b: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
