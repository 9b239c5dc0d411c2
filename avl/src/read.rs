use anyhow::Result;
use chrono::NaiveDateTime;
use model::{CoordinateSystem, Point, PropertyKind, PropertyValue};

use crate::ColumnMapping;

struct Columns {
    object_id: usize,
    timestamp: usize,
    coordinates: Vec<usize>,
    properties: Vec<(String, usize, PropertyKind)>,
}

/// Reads one point per row. Rows that can't be parsed are skipped with a warning; a missing
/// column is an error. Points come back in file order.
pub fn read_points<C: CoordinateSystem, R: std::io::Read>(
    reader: R,
    mapping: &ColumnMapping,
) -> Result<Vec<Point<C>>> {
    if mapping.coordinates.len() != C::DIMENSION {
        bail!(
            "{} coordinate columns given, but points have {} dimensions",
            mapping.coordinates.len(),
            C::DIMENSION
        );
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(mapping.delimiter_byte()?)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("No column named {name}"))
    };
    let columns = Columns {
        object_id: find(mapping.object_id.as_str())?,
        timestamp: find(mapping.timestamp.as_str())?,
        coordinates: mapping
            .coordinates
            .iter()
            .map(|name| find(name.as_str()))
            .collect::<Result<Vec<_>>>()?,
        properties: mapping
            .properties
            .iter()
            .map(|(name, kind)| -> Result<(String, usize, PropertyKind)> {
                Ok((name.clone(), find(name.as_str())?, *kind))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    let mut points = Vec::new();
    let mut skipped = 0;
    for (idx, rec) in reader.records().enumerate() {
        let rec = rec?;
        match parse_point(&rec, &columns, mapping) {
            Ok(pt) => points.push(pt),
            Err(err) => {
                // The header is line 1
                warn!("Skipping line {}: {}", idx + 2, err);
                skipped += 1;
            }
        }
    }
    info!("Read {} points, skipped {} rows", points.len(), skipped);
    Ok(points)
}

fn parse_point<C: CoordinateSystem>(
    rec: &csv::StringRecord,
    columns: &Columns,
    mapping: &ColumnMapping,
) -> Result<Point<C>> {
    let mut values = Vec::new();
    for idx in &columns.coordinates {
        let raw = field(rec, *idx)?;
        values.push(
            raw.parse::<f64>()
                .map_err(|err| anyhow!("Bad coordinate {raw}: {err}"))?,
        );
    }
    let coords = C::from_slice(&values).ok_or_else(|| anyhow!("Wrong number of coordinates"))?;

    let mut pt = Point::new(coords)
        .with_object_id(field(rec, columns.object_id)?)
        .with_timestamp(parse_timestamp(
            field(rec, columns.timestamp)?,
            &mapping.timestamp_format,
        )?);

    for (name, idx, kind) in &columns.properties {
        let raw = field(rec, *idx)?;
        // Blank cells just mean the property isn't there
        if raw.is_empty() {
            continue;
        }
        let value = match kind {
            PropertyKind::Real => PropertyValue::Real(
                raw.parse()
                    .map_err(|err| anyhow!("Bad {name} {raw}: {err}"))?,
            ),
            PropertyKind::Integer => PropertyValue::Integer(
                raw.parse()
                    .map_err(|err| anyhow!("Bad {name} {raw}: {err}"))?,
            ),
            PropertyKind::Text => PropertyValue::Text(raw.to_string()),
            PropertyKind::Timestamp => {
                PropertyValue::Timestamp(parse_timestamp(raw, &mapping.timestamp_format)?)
            }
        };
        pt.properties.set(name, value);
    }
    Ok(pt)
}

fn field(rec: &csv::StringRecord, idx: usize) -> Result<&str> {
    rec.get(idx)
        .map(|x| x.trim())
        .ok_or_else(|| anyhow!("Missing column {idx}"))
}

fn parse_timestamp(raw: &str, format: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, format)
        .map_err(|err| anyhow!("Bad timestamp {raw} (expecting {format}): {err}"))
}

/// Orders points by time, breaking ties by object. Assembly needs each object's points in time
/// order.
pub fn sort_points<C: CoordinateSystem>(points: &mut [Point<C>]) {
    points.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.object_id.cmp(&b.object_id))
    });
}
