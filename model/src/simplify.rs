use crate::{CoordinateSystem, Point, Trajectory};

/// Douglas-Peucker: drops points that stay within `tolerance` of the line between the points kept
/// around them. The first and last point always survive, and surviving points are unchanged.
pub fn simplify_points<C: CoordinateSystem>(points: &[Point<C>], tolerance: f64) -> Vec<Point<C>> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    // Spans to examine, as inclusive (first, last) indices
    let mut stack = vec![(0, points.len() - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = first;
        for idx in (first + 1)..last {
            let dist = C::perpendicular_distance(
                &points[idx].coords,
                &points[first].coords,
                &points[last].coords,
            );
            if dist > max_dist {
                max_dist = dist;
                max_idx = idx;
            }
        }
        if max_dist > tolerance {
            keep[max_idx] = true;
            stack.push((first, max_idx));
            stack.push((max_idx, last));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(pt, keep)| if keep { Some(pt.clone()) } else { None })
        .collect()
}

/// Simplifies the points, keeping the trajectory's properties.
pub fn simplify<C: CoordinateSystem>(trajectory: &Trajectory<C>, tolerance: f64) -> Trajectory<C> {
    let points = simplify_points(trajectory.points(), tolerance);
    if points.len() != trajectory.len() {
        debug!(
            "Simplified {} from {} to {} points",
            trajectory.trajectory_id(),
            trajectory.len(),
            points.len()
        );
    }
    trajectory.with_points_like(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::hourly;
    use crate::{Cartesian2D, Terrestrial};

    fn zig_zag() -> Vec<Point<Cartesian2D>> {
        [
            (0.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (3.0, 1.0),
            (4.0, 0.0),
            (5.0, 1.0),
            (6.0, 2.0),
            (7.0, 1.0),
            (8.0, 0.0),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| Point::new([x, y]).with_property("index", i as i64))
        .collect()
    }

    #[test]
    fn keeps_corners() {
        let points = zig_zag();
        let simple = simplify_points(&points, 0.01);
        let indices: Vec<i64> = simple
            .iter()
            .map(|pt| pt.properties.integer("index").unwrap())
            .collect();
        assert_eq!(indices, vec![0, 2, 4, 6, 8]);
        assert_eq!(simple[0], points[0]);
        assert_eq!(simple[4], points[8]);
    }

    #[test]
    fn large_tolerance_keeps_endpoints() {
        let points = zig_zag();
        let simple = simplify_points(&points, 100.0);
        assert_eq!(simple, vec![points[0].clone(), points[8].clone()]);
    }

    #[test]
    fn tiny_inputs_unchanged() {
        let points = zig_zag();
        assert_eq!(simplify_points(&points[0..2], 0.01), points[0..2].to_vec());
        assert!(simplify_points::<Cartesian2D>(&[], 0.01).is_empty());
    }

    #[test]
    fn straight_trajectory_keeps_properties() {
        let mut traj = hourly(11);
        traj.properties_mut().set("number", 123.0);
        traj.properties_mut().set("pilot", "Melissa");
        let simple = simplify(&traj, 0.01);
        assert_eq!(simple.len(), 2);
        assert_eq!(simple[0], traj[0]);
        assert_eq!(simple[1], traj[10]);
        assert_eq!(simple.properties(), traj.properties());
    }

    #[test]
    fn terrestrial_bump() {
        let traj: Trajectory<Terrestrial> = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.1), (3.0, 0.0), (4.0, 0.0)]
            .into_iter()
            .map(|(lon, lat)| Point::new([lon, lat]))
            .collect();
        // The bump is about 11km off the chord, the neighbors about 5.5km off theirs
        assert_eq!(simplify(&traj, 8000.0).len(), 3);
        assert_eq!(simplify(&traj, 20_000.0).len(), 2);
    }
}
