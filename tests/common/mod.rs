// Shared fixtures: shapes are drawn in the planar frame (km) and converted
// to lon/lat so their extents and areas are known exactly.
#![allow(dead_code)]

use geo::{Coord, LineString, MultiPolygon, Polygon};
use placetiles::{Projector, TilingConfig};

/// Planar origin (m) of every fixture shape, inland NSW.
pub const ORIGIN: (f64, f64) = (1_300_000.0, -3_700_000.0);

pub fn config() -> TilingConfig { TilingConfig::default() }

pub fn projector() -> Projector { Projector::new(&config().projection).unwrap() }

/// Planar polygon from a ring of `(x_km, y_km)` offsets from [`ORIGIN`].
pub fn planar_polygon(ring_km: &[(f64, f64)]) -> MultiPolygon<f64> {
    let ring = ring_km.iter()
        .map(|&(x, y)| Coord { x: ORIGIN.0 + x * 1000.0, y: ORIGIN.1 + y * 1000.0 })
        .collect::<Vec<_>>();
    MultiPolygon::new(vec![Polygon::new(LineString::new(ring), vec![])])
}

pub fn planar_rect(w_km: f64, h_km: f64) -> MultiPolygon<f64> {
    planar_polygon(&[(0.0, 0.0), (w_km, 0.0), (w_km, h_km), (0.0, h_km), (0.0, 0.0)])
}

/// The same shape in lon/lat degrees.
pub fn geodetic(projector: &Projector, planar: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    projector.to_geodetic(planar).unwrap()
}

/// GeoJSON polygon geometry for a lon/lat box.
pub fn lonlat_box(lon: f64, lat: f64, size: f64) -> serde_json::Value {
    serde_json::json!({ "type": "Polygon", "coordinates": [[
        [lon, lat], [lon + size, lat], [lon + size, lat + size], [lon, lat + size], [lon, lat]
    ]] })
}
