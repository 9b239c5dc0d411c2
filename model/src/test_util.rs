use chrono::NaiveDateTime;

use crate::{Cartesian2D, Point, Terrestrial, Trajectory};

pub fn ts(x: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(x, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Three points six hours apart, turning from north to south while speeding up.
pub fn flight() -> Trajectory<Terrestrial> {
    let mut traj = Trajectory::new();
    for (i, (lon, lat)) in [(-100.0, 35.0), (-95.0, 35.0), (-95.0, 30.0)]
        .into_iter()
        .enumerate()
    {
        traj.push(
            Point::new([lon, lat])
                .with_object_id("AAA001")
                .with_timestamp(ts(&format!("2014-01-01 {:02}:00:00", i * 6)))
                .with_property("heading", 90.0 * i as f64)
                .with_property("speed", 100.0 + 50.0 * i as f64)
                .with_property("status", format!("leg{i}")),
        );
    }
    traj
}

/// `n` points an hour apart starting at 2014-01-01 00:00, moving one unit along x each hour.
pub fn hourly(n: usize) -> Trajectory<Cartesian2D> {
    (0..n)
        .map(|i| {
            Point::new([i as f64, 0.0])
                .with_object_id("hourly")
                .with_timestamp(ts(&format!("2014-01-01 {:02}:00:00", i)))
                .with_property("index", i as f64)
        })
        .collect()
}
