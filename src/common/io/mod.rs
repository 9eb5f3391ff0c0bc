mod geojson;
mod shp;

use geo::MultiPolygon;
use serde_json::{Map, Value};

pub(crate) use geojson::read_features_from_geojson_bytes;
pub use geojson::{tiles_to_geojson, write_tiles_geojson, write_tiles_json};
pub(crate) use shp::read_features_from_shapefile;

/// One feature of a geometry source: attribute columns plus an optional shape
/// in the source's lon/lat frame.
#[derive(Debug, Clone)]
pub(crate) struct Feature {
    pub(crate) properties: Map<String, Value>,
    pub(crate) geometry: Option<MultiPolygon<f64>>,
}

/// A geometry source could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ParseError(pub(crate) String);
