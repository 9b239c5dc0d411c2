use std::collections::BTreeMap;

use chrono::Duration;

use crate::{geometry, CoordinateSystem, Point, PropertyValue, Trajectory};

/// Decides when a point adds nothing, or is a glitch, relative to the point before it. Every
/// check is optional; the default filter considers nothing bad.
#[derive(Clone, Debug, Default)]
pub struct BadPointFilter {
    /// Closer than this to the previous point means a duplicate.
    pub min_distance: Option<f64>,
    /// Further than this from the previous point means a position glitch.
    pub max_distance: Option<f64>,
    /// Less time than this since the previous point means a duplicate.
    pub min_time_gap: Option<Duration>,
    /// Numeric properties that can't plausibly change by more than this between points, like
    /// altitude.
    pub max_property_jump: BTreeMap<String, f64>,
}

impl BadPointFilter {
    pub fn is_bad_pair<C: CoordinateSystem>(&self, previous: &Point<C>, next: &Point<C>) -> bool {
        let dist = geometry::distance(previous, next);
        if self.min_distance.map(|min| dist < min).unwrap_or(false) {
            return true;
        }
        if self.max_distance.map(|max| dist > max).unwrap_or(false) {
            return true;
        }
        if let Some(min) = self.min_time_gap {
            if next.timestamp - previous.timestamp < min {
                return true;
            }
        }
        for (name, max_jump) in &self.max_property_jump {
            if let (Some(a), Some(b)) = (
                numeric(previous, name.as_str()),
                numeric(next, name.as_str()),
            ) {
                if (b - a).abs() > *max_jump {
                    return true;
                }
            }
        }
        false
    }
}

fn numeric<C: CoordinateSystem>(pt: &Point<C>, name: &str) -> Option<f64> {
    match pt.properties.get(name)? {
        PropertyValue::Real(x) => Some(*x),
        PropertyValue::Integer(x) => Some(*x as f64),
        _ => None,
    }
}

/// Keeps the first of every run of points where each is bad relative to the last kept point.
pub fn remove_bad_points<C: CoordinateSystem>(
    mut points: Vec<Point<C>>,
    filter: &BadPointFilter,
) -> Vec<Point<C>> {
    let before = points.len();
    points.dedup_by(|next, kept| filter.is_bad_pair(kept, next));
    if points.len() != before {
        debug!("Removed {} bad point(s)", before - points.len());
    }
    points
}

/// Cleans each trajectory, keeping its properties, then drops the ones left too short.
pub fn clean_trajectories<C: CoordinateSystem>(
    trajectories: Vec<Trajectory<C>>,
    filter: &BadPointFilter,
    minimum_length: usize,
) -> Vec<Trajectory<C>> {
    let mut results = Vec::new();
    for mut traj in trajectories {
        let properties = std::mem::take(traj.properties_mut());
        let points = remove_bad_points(traj.into_points(), filter);
        if points.len() < minimum_length {
            debug!("Dropping trajectory left with {} point(s)", points.len());
            continue;
        }
        let mut cleaned = Trajectory::from_points(points);
        *cleaned.properties_mut() = properties;
        results.push(cleaned);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ts;
    use crate::Cartesian3D;

    fn pt(x: f64, seconds: i64) -> Point<Cartesian3D> {
        Point::new([x, 0.0, 0.0]).with_timestamp(ts("2014-01-01 00:00:00") + Duration::seconds(seconds))
    }

    #[test]
    fn default_keeps_everything() {
        let points = vec![pt(0.0, 0), pt(0.0, 0), pt(0.0, 0)];
        assert_eq!(remove_bad_points(points, &BadPointFilter::default()).len(), 3);
    }

    #[test]
    fn collapses_duplicates() {
        let filter = BadPointFilter {
            min_distance: Some(1.0),
            ..Default::default()
        };
        let points = vec![pt(0.0, 0), pt(0.1, 1), pt(0.5, 2), pt(5.0, 3), pt(5.2, 4)];
        let cleaned = remove_bad_points(points, &filter);
        let xs: Vec<f64> = cleaned.iter().map(|p| p.coords[0]).collect();
        // 0.5 is compared against the kept 0.0, not the dropped 0.1
        assert_eq!(xs, vec![0.0, 5.0]);
    }

    #[test]
    fn rejects_glitches() {
        let filter = BadPointFilter {
            max_distance: Some(100.0),
            min_time_gap: Some(Duration::seconds(2)),
            ..Default::default()
        };
        let points = vec![pt(0.0, 0), pt(1.0, 1), pt(5000.0, 10), pt(10.0, 20)];
        let cleaned = remove_bad_points(points, &filter);
        let xs: Vec<f64> = cleaned.iter().map(|p| p.coords[0]).collect();
        assert_eq!(xs, vec![0.0, 10.0]);
    }

    #[test]
    fn altitude_jumps() {
        let mut filter = BadPointFilter::default();
        filter.max_property_jump.insert("altitude".to_string(), 1000.0);
        let points = vec![
            pt(0.0, 0).with_property("altitude", 30000.0),
            pt(1.0, 60).with_property("altitude", 2000.0),
            pt(2.0, 120).with_property("altitude", 30500_i64),
            pt(3.0, 180),
        ];
        let cleaned = remove_bad_points(points, &filter);
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[1].coords[0], 2.0);
    }

    #[test]
    fn cleaning_trajectories_keeps_properties() {
        let filter = BadPointFilter {
            min_distance: Some(1.0),
            ..Default::default()
        };
        let mut busy = Trajectory::from_points(vec![pt(0.0, 0), pt(3.0, 10), pt(6.0, 20)]);
        busy.properties_mut().set("pilot", "Melissa");
        let parked = Trajectory::from_points(vec![pt(0.0, 0), pt(0.0, 10), pt(0.0, 20)]);

        let cleaned = clean_trajectories(vec![busy.clone(), parked], &filter, 2);
        assert_eq!(cleaned, vec![busy]);
    }
}
