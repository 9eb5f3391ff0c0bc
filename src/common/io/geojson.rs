use std::{fs::File, io::BufWriter, path::Path};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Map, Value};

use super::{Feature, ParseError};
use crate::{error::Result, tiling::Tile};

/// Read all features of a GeoJSON FeatureCollection.
/// Features whose geometry is null or not (Multi)Polygon get `geometry: None`.
pub(crate) fn read_features_from_geojson_bytes(bytes: &[u8]) -> std::result::Result<Vec<Feature>, ParseError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ParseError(format!("invalid GeoJSON: {e}")))?;

    let features = value["features"].as_array()
        .ok_or_else(|| ParseError("GeoJSON has no 'features' array".into()))?;

    features.iter().enumerate()
        .map(|(idx, feature)| {
            let properties = match &feature["properties"] {
                Value::Object(map) => map.clone(),
                _ => Map::new(),
            };
            let geometry = parse_geometry(&feature["geometry"])
                .map_err(|e| ParseError(format!("feature {idx}: {}", e.0)))?;
            Ok(Feature { properties, geometry })
        })
        .collect()
}

/// Parse a GeoJSON geometry object into a MultiPolygon.
fn parse_geometry(geometry: &Value) -> std::result::Result<Option<MultiPolygon<f64>>, ParseError> {
    let Some(geometry) = geometry.as_object() else { return Ok(None) };
    let coords = geometry.get("coordinates").and_then(Value::as_array);

    match (geometry.get("type").and_then(Value::as_str), coords) {
        (Some("Polygon"), Some(rings)) => Ok(Some(MultiPolygon(vec![parse_polygon_coords(rings)?]))),
        (Some("MultiPolygon"), Some(polygons)) => {
            let polygons = polygons.iter()
                .map(|polygon| polygon.as_array()
                    .ok_or_else(|| ParseError("MultiPolygon member is not an array".into()))
                    .and_then(|rings| parse_polygon_coords(rings)))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        (Some("Polygon" | "MultiPolygon"), None) => Err(ParseError("geometry without coordinates".into())),
        _ => Ok(None),
    }
}

/// Parse GeoJSON Polygon coordinates: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> std::result::Result<Polygon<f64>, ParseError> {
    let mut rings = rings.iter().map(|ring| ring.as_array()
        .ok_or_else(|| ParseError("ring is not an array".into()))
        .and_then(|coords| parse_ring_coords(coords)));

    let exterior = rings.next()
        .ok_or_else(|| ParseError("Polygon without exterior ring".into()))??;
    let interiors = rings.collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring from GeoJSON coordinates `[[x, y], [x, y], ...]`, closing it if needed.
fn parse_ring_coords(coords: &[Value]) -> std::result::Result<LineString<f64>, ParseError> {
    let mut points = coords.iter()
        .map(|pair| match pair.as_array().map(Vec::as_slice) {
            Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(ParseError("coordinate must be numeric".into())),
            },
            _ => Err(ParseError("coordinate must have at least two values".into())),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

/// Export tiles as a GeoJSON FeatureCollection of rectangles for map inspection.
pub fn tiles_to_geojson(tiles: &[Tile]) -> Value {
    let features = tiles.iter().map(|tile| {
        let (low, high) = (tile.low, tile.high);
        let ring = [
            [low.longitude, low.latitude],
            [high.longitude, low.latitude],
            [high.longitude, high.latitude],
            [low.longitude, high.latitude],
            [low.longitude, low.latitude],
        ];
        json!({
            "type": "Feature",
            "id": tile.tile_name,
            "geometry": { "type": "Polygon", "coordinates": [ring] },
            "properties": {
                "tile_name": tile.tile_name,
                "region": tile.region,
                "state": tile.state,
                "source": tile.source,
            },
        })
    }).collect::<Vec<_>>();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Write tiles to `path` as a GeoJSON FeatureCollection.
pub fn write_tiles_geojson(path: &Path, tiles: &[Tile]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, &tiles_to_geojson(tiles)).map_err(std::io::Error::from)?;
    Ok(())
}

/// Write tiles to `path` as a pretty-printed JSON array of tile records.
pub fn write_tiles_json(path: &Path, tiles: &[Tile]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, tiles).map_err(std::io::Error::from)?;
    Ok(())
}
