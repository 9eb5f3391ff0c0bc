use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};
use shapefile::{
    dbase::{FieldValue, Record},
    PolygonRing, Reader, Shape,
};

use super::{Feature, ParseError};

/// Reads every shape + record of a `.shp` file (with its sibling `.dbf`),
/// keeping only the attribute columns named in `fields`.
pub(crate) fn read_features_from_shapefile(path: &Path, fields: &[&str]) -> Result<Vec<Feature>, ParseError> {
    let mut reader = Reader::from_path(path)
        .map_err(|e| ParseError(format!("failed to open shapefile: {e}")))?;

    reader.iter_shapes_and_records()
        .enumerate()
        .map(|(idx, result)| {
            let (shape, record) = result
                .map_err(|e| ParseError(format!("error reading shape+record {idx}: {e}")))?;
            let geometry = match shape {
                Shape::Polygon(polygon) => Some(shp_to_geo(&polygon)),
                Shape::NullShape => None,
                other => return Err(ParseError(format!("found non-Polygon shape: {:?}", other.shapetype()))),
            };
            Ok(Feature { properties: record_to_properties(&record, fields), geometry })
        })
        .collect()
}

/// Copy the requested attribute columns of a dBASE record into a JSON map.
fn record_to_properties(record: &Record, fields: &[&str]) -> Map<String, Value> {
    fields.iter()
        .filter_map(|&field| {
            let value = match record.get(field)? {
                FieldValue::Character(Some(s)) => Value::from(s.trim()),
                FieldValue::Numeric(Some(n)) => Value::from(*n),
                FieldValue::Float(Some(n)) => Value::from(*n as f64),
                FieldValue::Double(n) => Value::from(*n),
                FieldValue::Integer(n) => Value::from(*n),
                _ => Value::Null,
            };
            Some((field.to_string(), value))
        })
        .collect()
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>.
/// Shapefile stores each outer ring followed by its holes.
pub(crate) fn shp_to_geo(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    fn to_line_string(points: &[shapefile::Point]) -> LineString<f64> {
        let mut coords = points.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect::<Vec<_>>();
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0]);
        }
        LineString(coords)
    }

    let mut polygons = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes = Vec::new();

    for ring in polygon.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                // flush previous polygon
                if let Some(exterior) = current_exterior.take() {
                    polygons.push(Polygon::new(exterior, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(to_line_string(points));
            }
            PolygonRing::Inner(points) => current_holes.push(to_line_string(points)),
        }
    }
    if let Some(exterior) = current_exterior {
        polygons.push(Polygon::new(exterior, current_holes));
    }

    MultiPolygon(polygons)
}
