use std::fmt::Debug;

use geo::{Bearing, Distance, Euclidean, Haversine};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Matches the radius `geo` uses for haversine distances.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// How coordinates are blended and measured. Distances are in the system's own unit: whatever the
/// coordinates are in for the Cartesian systems, meters for `Terrestrial`.
pub trait CoordinateSystem:
    Clone + Copy + Debug + Default + PartialEq + Send + Sync + 'static
{
    type Coords: Clone
        + Copy
        + Debug
        + Default
        + PartialEq
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + AsRef<[f64]>;

    const DIMENSION: usize;

    /// None if the slice has the wrong length
    fn from_slice(values: &[f64]) -> Option<Self::Coords>;

    /// Unclamped; `t` outside [0, 1] extrapolates.
    fn lerp(a: &Self::Coords, b: &Self::Coords, t: f64) -> Self::Coords;

    fn distance(a: &Self::Coords, b: &Self::Coords) -> f64;

    /// Shortest distance from `pt` to the segment between `a` and `b`.
    fn perpendicular_distance(pt: &Self::Coords, a: &Self::Coords, b: &Self::Coords) -> f64;

    /// Degrees clockwise from north (or the +y axis), in [0, 360).
    fn bearing(a: &Self::Coords, b: &Self::Coords) -> f64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartesian2D;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartesian3D;

/// Longitude and latitude in degrees, on a spherical earth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrestrial;

impl CoordinateSystem for Cartesian2D {
    type Coords = [f64; 2];
    const DIMENSION: usize = 2;

    fn from_slice(values: &[f64]) -> Option<[f64; 2]> {
        values.try_into().ok()
    }

    fn lerp(a: &[f64; 2], b: &[f64; 2], t: f64) -> [f64; 2] {
        [lerp(a[0], b[0], t), lerp(a[1], b[1], t)]
    }

    fn distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
        Euclidean::distance(to_geo(a), to_geo(b))
    }

    fn perpendicular_distance(pt: &[f64; 2], a: &[f64; 2], b: &[f64; 2]) -> f64 {
        euclidean_to_segment(pt, a, b)
    }

    fn bearing(a: &[f64; 2], b: &[f64; 2]) -> f64 {
        planar_bearing(a, b)
    }
}

impl CoordinateSystem for Cartesian3D {
    type Coords = [f64; 3];
    const DIMENSION: usize = 3;

    fn from_slice(values: &[f64]) -> Option<[f64; 3]> {
        values.try_into().ok()
    }

    fn lerp(a: &[f64; 3], b: &[f64; 3], t: f64) -> [f64; 3] {
        [
            lerp(a[0], b[0], t),
            lerp(a[1], b[1], t),
            lerp(a[2], b[2], t),
        ]
    }

    fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (y - x).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    fn perpendicular_distance(pt: &[f64; 3], a: &[f64; 3], b: &[f64; 3]) -> f64 {
        euclidean_to_segment(pt, a, b)
    }

    // Ignores the z axis
    fn bearing(a: &[f64; 3], b: &[f64; 3]) -> f64 {
        planar_bearing(a, b)
    }
}

impl CoordinateSystem for Terrestrial {
    type Coords = [f64; 2];
    const DIMENSION: usize = 2;

    fn from_slice(values: &[f64]) -> Option<[f64; 2]> {
        values.try_into().ok()
    }

    /// Follows the great circle between the two points.
    fn lerp(a: &[f64; 2], b: &[f64; 2], t: f64) -> [f64; 2] {
        if a == b {
            return *a;
        }
        let va = to_unit_vector(a);
        let vb = to_unit_vector(b);
        // acos of the dot product loses precision for nearly coincident points
        let omega = norm(&cross(&va, &vb)).atan2(dot(&va, &vb));
        let sin_omega = omega.sin();
        // Coincident or antipodal points don't define a unique great circle
        if sin_omega.abs() < 1e-12 {
            return [lerp(a[0], b[0], t), lerp(a[1], b[1], t)];
        }
        let wa = ((1.0 - t) * omega).sin() / sin_omega;
        let wb = (t * omega).sin() / sin_omega;
        let v = [
            wa * va[0] + wb * vb[0],
            wa * va[1] + wb * vb[1],
            wa * va[2] + wb * vb[2],
        ];
        from_unit_vector(&v)
    }

    fn distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
        Haversine::distance(to_geo(a), to_geo(b))
    }

    fn perpendicular_distance(pt: &[f64; 2], a: &[f64; 2], b: &[f64; 2]) -> f64 {
        let d_ab = Self::distance(a, b);
        let d_ap = Self::distance(a, pt);
        if d_ab == 0.0 {
            return d_ap;
        }
        let delta = (Self::bearing(a, pt) - Self::bearing(a, b)).to_radians();
        // Behind the start of the segment
        if delta.cos() < 0.0 {
            return d_ap;
        }
        let angular_ap = d_ap / EARTH_RADIUS_METERS;
        let cross_track = (angular_ap.sin() * delta.sin()).clamp(-1.0, 1.0).asin();
        let along_track =
            (angular_ap.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos() * EARTH_RADIUS_METERS;
        if along_track > d_ab {
            return Self::distance(b, pt);
        }
        cross_track.abs() * EARTH_RADIUS_METERS
    }

    fn bearing(a: &[f64; 2], b: &[f64; 2]) -> f64 {
        Haversine::bearing(to_geo(a), to_geo(b)).rem_euclid(360.0)
    }
}

// Same as a + t * (b - a), but exact at both ends
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

fn to_geo(pt: &[f64; 2]) -> geo::Point<f64> {
    geo::Point::new(pt[0], pt[1])
}

fn planar_bearing(a: &[f64], b: &[f64]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    dx.atan2(dy).to_degrees().rem_euclid(360.0)
}

fn euclidean_to_segment(pt: &[f64], a: &[f64], b: &[f64]) -> f64 {
    let ab: Vec<f64> = a.iter().zip(b).map(|(a, b)| b - a).collect();
    let ap: Vec<f64> = a.iter().zip(pt).map(|(a, p)| p - a).collect();
    let len_sq: f64 = ab.iter().map(|x| x * x).sum();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (ab.iter().zip(&ap).map(|(x, y)| x * y).sum::<f64>() / len_sq).clamp(0.0, 1.0)
    };
    ap.iter()
        .zip(&ab)
        .map(|(p, d)| (p - t * d).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn to_unit_vector(lon_lat: &[f64; 2]) -> [f64; 3] {
    let lon = lon_lat[0].to_radians();
    let lat = lon_lat[1].to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn from_unit_vector(v: &[f64; 3]) -> [f64; 2] {
    let horizontal = (v[0] * v[0] + v[1] * v[1]).sqrt();
    [
        v[1].atan2(v[0]).to_degrees(),
        v[2].atan2(horizontal).to_degrees(),
    ]
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(v: &[f64; 3]) -> f64 {
    dot(v, v).sqrt()
}
