use std::ops::{Index, RangeBounds};

use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{beginning_of_time, CoordinateSystem, Point, PropertyMap};

/// Stands in for the object and trajectory ID of trajectories without points.
pub const EMPTY_ID: &str = "(empty)";

const DEFAULT_ID_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Points of one object ordered by time, plus properties describing the whole trajectory.
///
/// Anything derived from a trajectory (slices, time windows, simplified copies) carries a copy of
/// the parent's properties.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Trajectory<C: CoordinateSystem> {
    points: Vec<Point<C>>,
    properties: PropertyMap,
}

impl<C: CoordinateSystem> Trajectory<C> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Doesn't check the points are sorted by time.
    pub fn from_points(points: Vec<Point<C>>) -> Self {
        Self {
            points,
            properties: PropertyMap::new(),
        }
    }

    pub fn from_points_checked(points: Vec<Point<C>>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[0].timestamp > pair[1].timestamp {
                bail!(
                    "Trajectory input out-of-order: {} then {}",
                    pair[0].timestamp,
                    pair[1].timestamp
                );
            }
        }
        Ok(Self::from_points(points))
    }

    /// Copies these properties, but uses different points.
    pub fn with_points_like(&self, points: Vec<Point<C>>) -> Self {
        Self {
            points,
            properties: self.properties.clone(),
        }
    }

    pub fn push(&mut self, pt: Point<C>) {
        self.points.push(pt);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Point<C>> {
        self.points.get(idx)
    }

    pub fn first(&self) -> Option<&Point<C>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point<C>> {
        self.points.last()
    }

    pub fn points(&self) -> &[Point<C>] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<Point<C>> {
        self.points.iter()
    }

    pub fn into_points(self) -> Vec<Point<C>> {
        self.points
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    /// Per-point properties can be changed in place, but not the sequence itself.
    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut Point<C>> {
        self.points.iter_mut()
    }

    /// A new trajectory with a contiguous range of points. Panics if the range is out of bounds,
    /// like slicing a Vec.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let start = match range.start_bound() {
            std::ops::Bound::Included(x) => *x,
            std::ops::Bound::Excluded(x) => *x + 1,
            std::ops::Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            std::ops::Bound::Included(x) => *x + 1,
            std::ops::Bound::Excluded(x) => *x,
            std::ops::Bound::Unbounded => self.points.len(),
        };
        self.with_points_like(self.points[start..end].to_vec())
    }

    pub fn object_id(&self) -> &str {
        match self.points.last() {
            Some(pt) if !pt.object_id.is_empty() => &pt.object_id,
            _ => EMPTY_ID,
        }
    }

    /// Object ID plus the start and end time.
    pub fn trajectory_id(&self) -> String {
        self.trajectory_id_with_format(DEFAULT_ID_TIME_FORMAT)
    }

    /// Like `trajectory_id`, with a `chrono` format string for the timestamps.
    pub fn trajectory_id_with_format(&self, fmt: &str) -> String {
        if self.points.is_empty() {
            return EMPTY_ID.to_string();
        }
        format!(
            "{}_{}_{}",
            self.object_id(),
            self.start_time().format(fmt),
            self.end_time().format(fmt)
        )
    }

    /// The beginning of time if there are no points
    pub fn start_time(&self) -> NaiveDateTime {
        self.points
            .first()
            .map(|pt| pt.timestamp)
            .unwrap_or_else(beginning_of_time)
    }

    /// The beginning of time if there are no points
    pub fn end_time(&self) -> NaiveDateTime {
        self.points
            .last()
            .map(|pt| pt.timestamp)
            .unwrap_or_else(beginning_of_time)
    }

    pub fn duration(&self) -> Duration {
        if self.points.len() < 2 {
            return Duration::zero();
        }
        self.end_time() - self.start_time()
    }
}

impl<C: CoordinateSystem> Index<usize> for Trajectory<C> {
    type Output = Point<C>;

    fn index(&self, idx: usize) -> &Point<C> {
        &self.points[idx]
    }
}

impl<C: CoordinateSystem> FromIterator<Point<C>> for Trajectory<C> {
    fn from_iter<I: IntoIterator<Item = Point<C>>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

impl<'a, C: CoordinateSystem> IntoIterator for &'a Trajectory<C> {
    type Item = &'a Point<C>;
    type IntoIter = std::slice::Iter<'a, Point<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{flight, ts};
    use crate::Terrestrial;

    #[test]
    fn derived_ids() {
        let traj = flight();
        assert_eq!(traj.object_id(), "AAA001");
        assert_eq!(
            traj.trajectory_id(),
            "AAA001_20140101000000_20140101120000"
        );
        assert_eq!(
            traj.trajectory_id_with_format("%Y-%m-%dT%H:%M"),
            "AAA001_2014-01-01T00:00_2014-01-01T12:00"
        );
    }

    #[test]
    fn empty_ids() {
        let traj: Trajectory<Terrestrial> = Trajectory::new();
        assert_eq!(traj.object_id(), EMPTY_ID);
        assert_eq!(traj.trajectory_id(), EMPTY_ID);
        assert_eq!(traj.start_time(), beginning_of_time());
    }

    #[test]
    fn object_id_from_last_point() {
        let mut traj: Trajectory<Terrestrial> = Trajectory::new();
        traj.push(Point::new([0.0, 0.0]).with_object_id("first"));
        traj.push(Point::new([1.0, 0.0]));
        assert_eq!(traj.object_id(), EMPTY_ID);
        traj.push(Point::new([2.0, 0.0]).with_object_id("last"));
        assert_eq!(traj.object_id(), "last");
    }

    #[test]
    fn duration() {
        let mut traj: Trajectory<Terrestrial> = Trajectory::new();
        assert_eq!(traj.duration(), Duration::zero());
        traj.push(Point::new([0.0, 0.0]).with_timestamp(ts("2014-01-01 00:00:00")));
        assert_eq!(traj.duration(), Duration::zero());
        traj.push(Point::new([0.0, 0.0]).with_timestamp(ts("2014-01-01 02:30:00")));
        assert_eq!(traj.duration(), Duration::minutes(150));
        assert_eq!(flight().duration(), Duration::hours(12));
    }

    #[test]
    fn slice_keeps_properties() {
        let mut traj = flight();
        traj.properties_mut().set("number", 123.0);
        traj.properties_mut().set("pilot", "Melissa");

        for (start, end) in [(0, 1), (0, 3), (1, 2), (2, 3)] {
            let sub = traj.slice(start..end);
            assert_eq!(sub.len(), end - start);
            assert_eq!(sub.properties().real("number"), Some(123.0));
            assert_eq!(sub.properties().text("pilot"), Some("Melissa"));
            assert_eq!(sub[0], traj[start]);
        }
        assert_eq!(traj.slice(..).len(), 3);
        assert_eq!(traj.slice(1..=2).points(), &traj.points()[1..]);
    }

    #[test]
    fn checked_construction() {
        let pts = flight().into_points();
        assert!(Trajectory::from_points_checked(pts.clone()).is_ok());
        let mut reversed = pts;
        reversed.reverse();
        assert!(Trajectory::from_points_checked(reversed).is_err());
    }

    #[test]
    fn clone_is_deep() {
        let traj = flight();
        let mut copy = traj.clone();
        for pt in copy.points_mut() {
            pt.properties.set("speed", 0.0);
        }
        assert_eq!(traj[1].properties.real("speed"), Some(150.0));
        assert_eq!(copy[1].properties.real("speed"), Some(0.0));
    }
}
