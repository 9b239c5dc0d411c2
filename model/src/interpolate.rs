use chrono::{Duration, NaiveDateTime};

use crate::coords::lerp;
use crate::{CoordinateSystem, Point, PropertyMap, PropertyValue};

/// Blends two values. `t` is not clamped: 0 gives `self`, 1 gives `other`, and anything outside
/// [0, 1] extrapolates along the same line.
pub trait Interpolate: Sized {
    fn interpolate(&self, other: &Self, t: f64) -> Self;
}

pub fn interpolate<T: Interpolate>(a: &T, b: &T, t: f64) -> T {
    a.interpolate(b, t)
}

/// Identical to `interpolate`; the name just states that `t` is expected to leave [0, 1].
pub fn extrapolate<T: Interpolate>(a: &T, b: &T, t: f64) -> T {
    a.interpolate(b, t)
}

// Values that can't be blended come from whichever side `t` is closer to.
fn nearest<T: Clone>(a: &T, b: &T, t: f64) -> T {
    if t < 0.5 {
        a.clone()
    } else {
        b.clone()
    }
}

impl Interpolate for f64 {
    fn interpolate(&self, other: &f64, t: f64) -> f64 {
        lerp(*self, *other, t)
    }
}

impl Interpolate for i64 {
    fn interpolate(&self, other: &i64, t: f64) -> i64 {
        lerp(*self as f64, *other as f64, t).round() as i64
    }
}

impl Interpolate for String {
    fn interpolate(&self, other: &String, t: f64) -> String {
        nearest(self, other, t)
    }
}

impl Interpolate for NaiveDateTime {
    fn interpolate(&self, other: &NaiveDateTime, t: f64) -> NaiveDateTime {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }
        let delta = *other - *self;
        let micros = delta
            .num_microseconds()
            .map(|us| us as f64)
            .unwrap_or_else(|| delta.num_milliseconds() as f64 * 1000.0);
        let offset = Duration::microseconds((micros * t).round() as i64);
        match self.checked_add_signed(offset) {
            Some(result) => result,
            None if offset < Duration::zero() => NaiveDateTime::MIN,
            None => NaiveDateTime::MAX,
        }
    }
}

impl Interpolate for PropertyValue {
    fn interpolate(&self, other: &PropertyValue, t: f64) -> PropertyValue {
        match (self, other) {
            (PropertyValue::Real(a), PropertyValue::Real(b)) => {
                PropertyValue::Real(a.interpolate(b, t))
            }
            (PropertyValue::Integer(a), PropertyValue::Integer(b)) => {
                PropertyValue::Integer(a.interpolate(b, t))
            }
            (PropertyValue::Timestamp(a), PropertyValue::Timestamp(b)) => {
                PropertyValue::Timestamp(a.interpolate(b, t))
            }
            // Text, and any mismatched kinds
            _ => nearest(self, other, t),
        }
    }
}

impl Interpolate for PropertyMap {
    /// Names on both sides are blended; names on only one side are copied.
    fn interpolate(&self, other: &PropertyMap, t: f64) -> PropertyMap {
        let mut result = PropertyMap::new();
        for (name, value) in self.iter() {
            match other.get(name) {
                Some(other_value) => result.set(name, value.interpolate(other_value, t)),
                None => result.set(name, value.clone()),
            };
        }
        for (name, value) in other.iter() {
            if !self.contains(name) {
                result.set(name, value.clone());
            }
        }
        result
    }
}

impl<C: CoordinateSystem> Interpolate for Point<C> {
    /// The object ID follows the nearest side, like string properties.
    fn interpolate(&self, other: &Point<C>, t: f64) -> Point<C> {
        // Great circle math isn't exact at the endpoints, but these must be
        if t == 0.0 {
            return self.clone();
        }
        if t == 1.0 {
            return other.clone();
        }
        Point {
            coords: C::lerp(&self.coords, &other.coords, t),
            object_id: nearest(&self.object_id, &other.object_id, t),
            timestamp: self.timestamp.interpolate(&other.timestamp, t),
            properties: self.properties.interpolate(&other.properties, t),
        }
    }
}
