use std::collections::BTreeSet;

use anyhow::Result;
use model::{CoordinateSystem, Point, PropertyValue, Trajectory};

use crate::ColumnMapping;

/// Writes one row per point, using the mapping's column names and timestamp format. Every
/// property found on any point gets a column; points lacking it leave the cell blank.
pub fn write_points<C: CoordinateSystem, W: std::io::Write>(
    writer: W,
    points: &[Point<C>],
    mapping: &ColumnMapping,
) -> Result<()> {
    let rows: Vec<(Option<String>, &Point<C>)> = points.iter().map(|pt| (None, pt)).collect();
    write_rows(writer, rows, mapping)
}

/// Like `write_points`, with an extra leading `trajectory_id` column.
pub fn write_trajectories<C: CoordinateSystem, W: std::io::Write>(
    writer: W,
    trajectories: &[Trajectory<C>],
    mapping: &ColumnMapping,
) -> Result<()> {
    let mut rows = Vec::new();
    for traj in trajectories {
        let id = traj.trajectory_id();
        for pt in traj {
            rows.push((Some(id.clone()), pt));
        }
    }
    write_rows(writer, rows, mapping)
}

fn write_rows<C: CoordinateSystem, W: std::io::Write>(
    writer: W,
    rows: Vec<(Option<String>, &Point<C>)>,
    mapping: &ColumnMapping,
) -> Result<()> {
    if mapping.coordinates.len() != C::DIMENSION {
        bail!(
            "{} coordinate columns given, but points have {} dimensions",
            mapping.coordinates.len(),
            C::DIMENSION
        );
    }
    let with_trajectory_id = rows.iter().any(|(id, _)| id.is_some());
    let property_names: BTreeSet<&str> = rows
        .iter()
        .flat_map(|(_, pt)| pt.properties.names())
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(mapping.delimiter_byte()?)
        .from_writer(writer);

    let mut header: Vec<&str> = Vec::new();
    if with_trajectory_id {
        header.push("trajectory_id");
    }
    header.push(&mapping.object_id);
    header.push(&mapping.timestamp);
    header.extend(mapping.coordinates.iter().map(|x| x.as_str()));
    header.extend(property_names.iter().cloned());
    writer.write_record(&header)?;

    for (id, pt) in &rows {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if with_trajectory_id {
            record.push(id.clone().unwrap_or_default());
        }
        record.push(pt.object_id.clone());
        record.push(pt.timestamp.format(&mapping.timestamp_format).to_string());
        record.extend(pt.coords.as_ref().iter().map(|x| x.to_string()));
        for name in &property_names {
            record.push(
                pt.properties
                    .get(name)
                    .map(|value| format_value(value, &mapping.timestamp_format))
                    .unwrap_or_default(),
            );
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    debug!("Wrote {} rows", rows.len());
    Ok(())
}

fn format_value(value: &PropertyValue, timestamp_format: &str) -> String {
    match value {
        PropertyValue::Real(x) => x.to_string(),
        PropertyValue::Integer(x) => x.to_string(),
        PropertyValue::Text(x) => x.clone(),
        PropertyValue::Timestamp(x) => x.format(timestamp_format).to_string(),
    }
}
