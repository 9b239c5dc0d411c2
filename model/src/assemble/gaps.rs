use std::collections::BTreeMap;

use crate::{AssemblyConfig, CoordinateSystem, Point, Trajectory};

/// Splits one object's time-sorted points wherever two neighbors are apart, keeping the runs
/// that are long enough. The input isn't checked for ordering.
pub fn split_on_gaps<C: CoordinateSystem>(
    points: &[Point<C>],
    config: &AssemblyConfig,
) -> Vec<Trajectory<C>> {
    let mut results = Vec::new();
    let mut start = 0;
    for idx in 1..=points.len() {
        if idx < points.len() && !config.is_apart(&points[idx - 1], &points[idx]) {
            continue;
        }
        let run = &points[start..idx];
        if run.len() >= config.minimum_length {
            results.push(Trajectory::from_points(run.to_vec()));
        } else {
            debug!(
                "Dropping run of {} point(s) for {:?} starting at {}",
                run.len(),
                run[0].object_id,
                run[0].timestamp
            );
        }
        start = idx;
    }
    results
}

/// Groups points by object, then splits each object's points into trajectories. Points for the
/// same object must arrive in time order; objects may be interleaved. The output is ordered by
/// object ID, then time.
pub fn assemble<C: CoordinateSystem, I: IntoIterator<Item = Point<C>>>(
    points: I,
    config: &AssemblyConfig,
) -> Vec<Trajectory<C>> {
    let mut per_object: BTreeMap<String, Vec<Point<C>>> = BTreeMap::new();
    let mut count = 0;
    for pt in points {
        count += 1;
        per_object
            .entry(pt.object_id.clone())
            .or_insert_with(Vec::new)
            .push(pt);
    }

    let mut results = Vec::new();
    for points in per_object.values() {
        results.extend(split_on_gaps(points, config));
    }
    info!(
        "Assembled {} trajectories from {} points for {} objects",
        results.len(),
        count,
        per_object.len()
    );
    results
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};

    use super::*;
    use crate::test_util::ts;
    use crate::Cartesian2D;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // One point per minute for `id`, except where `gaps` inserts an hour before that index
    fn points_with_gaps(id: &str, n: usize, gaps: &[usize]) -> Vec<Point<Cartesian2D>> {
        let mut time = ts("2014-01-01 00:00:00");
        let mut result = Vec::new();
        for i in 0..n {
            if gaps.contains(&i) {
                time += Duration::hours(1);
            }
            result.push(
                Point::new([i as f64, 0.0])
                    .with_object_id(id)
                    .with_timestamp(time),
            );
            time += Duration::minutes(1);
        }
        result
    }

    fn starts(trajectories: &[Trajectory<Cartesian2D>]) -> Vec<f64> {
        trajectories.iter().map(|t| t[0].coords[0]).collect()
    }

    #[test]
    fn no_input() {
        init();
        let config = AssemblyConfig::default();
        assert!(split_on_gaps::<Cartesian2D>(&[], &config).is_empty());
        assert!(assemble(Vec::<Point<Cartesian2D>>::new(), &config).is_empty());
    }

    #[test]
    fn splits_at_gap() {
        init();
        let points = points_with_gaps("bus", 10, &[4]);
        let trajectories = split_on_gaps(&points, &AssemblyConfig::default());
        assert_eq!(trajectories.len(), 2);
        assert_eq!(trajectories[0].len(), 4);
        assert_eq!(trajectories[1].len(), 6);
        assert_eq!(trajectories[0].points(), &points[0..4]);
        assert_eq!(trajectories[1].points(), &points[4..]);
    }

    #[test]
    fn gap_exactly_at_threshold_splits() {
        init();
        let t0: NaiveDateTime = ts("2014-01-01 00:00:00");
        let points: Vec<Point<Cartesian2D>> = [0, 1, 21, 22]
            .into_iter()
            .map(|m| {
                Point::new([0.0, 0.0])
                    .with_object_id("x")
                    .with_timestamp(t0 + Duration::minutes(m))
            })
            .collect();
        let trajectories = split_on_gaps(&points, &AssemblyConfig::default());
        assert_eq!(trajectories.len(), 2);
    }

    #[test]
    fn short_runs_dropped() {
        init();
        // A single point after the gap
        let points = points_with_gaps("bus", 5, &[4]);
        let trajectories = split_on_gaps(&points, &AssemblyConfig::default());
        assert_eq!(trajectories.len(), 1);
        assert_eq!(trajectories[0].len(), 4);

        let config = AssemblyConfig {
            minimum_length: 5,
            ..Default::default()
        };
        let points = points_with_gaps("bus", 12, &[4, 6]);
        assert_eq!(starts(&split_on_gaps(&points, &config)), vec![6.0]);
    }

    #[test]
    fn splits_on_distance() {
        init();
        let mut points = points_with_gaps("bus", 6, &[]);
        for pt in &mut points[3..] {
            pt.coords[0] += 1000.0;
        }
        let config = AssemblyConfig {
            separation_distance: Some(100.0),
            ..Default::default()
        };
        assert_eq!(starts(&split_on_gaps(&points, &config)), vec![0.0, 1003.0]);
        assert_eq!(split_on_gaps(&points, &AssemblyConfig::default()).len(), 1);
    }

    #[test]
    fn groups_interleaved_objects() {
        init();
        let mut points = points_with_gaps("b", 6, &[3]);
        points.extend(points_with_gaps("a", 4, &[]));
        points.sort_by_key(|pt| pt.timestamp);

        let trajectories = assemble(points, &AssemblyConfig::default());
        let ids: Vec<&str> = trajectories.iter().map(|t| t.object_id()).collect();
        assert_eq!(ids, vec!["a", "b", "b"]);
        assert_eq!(trajectories[1].len(), 3);
        assert_eq!(trajectories[2].len(), 3);
        for traj in &trajectories {
            for pair in traj.points().windows(2) {
                assert!(pair[0].timestamp <= pair[1].timestamp);
            }
        }
    }
}
