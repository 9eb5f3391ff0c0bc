mod fs;
mod io;

pub use fs::ensure_parent_dir_exists;
pub use io::{tiles_to_geojson, write_tiles_geojson, write_tiles_json};
pub(crate) use io::{read_features_from_geojson_bytes, read_features_from_shapefile, Feature, ParseError};
