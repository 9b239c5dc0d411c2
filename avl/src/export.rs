use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use model::{CoordinateSystem, PropertyValue, Trajectory};
use serde_json::Value;

/// One feature per trajectory: a LineString through its points (a Point if it only has one, no
/// geometry if it's empty), carrying the trajectory's properties plus its id and time span.
pub fn trajectories_to_geojson<C: CoordinateSystem>(
    trajectories: &[Trajectory<C>],
    time_format: &str,
) -> GeoJson {
    let mut features = Vec::new();
    for traj in trajectories {
        let geometry = match traj.len() {
            0 => None,
            1 => Some(Geometry::new(geojson::Value::Point(
                traj[0].coords.as_ref().to_vec(),
            ))),
            _ => Some(Geometry::new(geojson::Value::LineString(
                traj.iter().map(|pt| pt.coords.as_ref().to_vec()).collect(),
            ))),
        };
        let mut feature = Feature {
            bbox: None,
            geometry,
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("object_id", traj.object_id());
        feature.set_property("trajectory_id", traj.trajectory_id());
        if !traj.is_empty() {
            feature.set_property("start_time", traj.start_time().format(time_format).to_string());
            feature.set_property("end_time", traj.end_time().format(time_format).to_string());
        }
        for (name, value) in traj.properties() {
            feature.set_property(name, to_json(value, time_format));
        }
        features.push(feature);
    }

    GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn trajectories_to_geojson_string<C: CoordinateSystem>(
    trajectories: &[Trajectory<C>],
    time_format: &str,
) -> Result<String> {
    let gj = trajectories_to_geojson(trajectories, time_format);
    Ok(serde_json::to_string_pretty(&gj)?)
}

fn to_json(value: &PropertyValue, time_format: &str) -> Value {
    match value {
        // NaN and infinities become null
        PropertyValue::Real(x) => Value::from(*x),
        PropertyValue::Integer(x) => Value::from(*x),
        PropertyValue::Text(x) => Value::from(x.clone()),
        PropertyValue::Timestamp(x) => Value::from(x.format(time_format).to_string()),
    }
}
