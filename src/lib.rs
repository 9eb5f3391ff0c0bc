#![doc = "Adaptive search-tile generation for Australian statistical and administrative regions"]
mod catalog;
mod common;
mod config;
mod error;
mod geom;
mod tiling;

#[doc(inline)]
pub use catalog::{close_matches, normalize_name, similarity, FieldMap, Region, RegionCatalog, SourceType};

#[doc(inline)]
pub use common::{ensure_parent_dir_exists, tiles_to_geojson, write_tiles_geojson, write_tiles_json};

#[doc(inline)]
pub use config::{AreaBracket, DiagnosticsConfig, HeuristicConfig, LookupConfig, PartitionConfig, ProjectionConfig, TilingConfig};

#[doc(inline)]
pub use error::{Result, TilingError};

#[doc(inline)]
pub use geom::Projector;

#[doc(inline)]
pub use tiling::{
    classify, determine_tile_size_km, diagnose, generate_tiles, sanitize_name, sweep_catalog,
    BoundsOverride, CoverageReport, LatLng, PartitionInput, PartitionOutcome, Partitioner, PresetTable,
    RegionOutcome, RegionPreset, RegionStatus, SizeRule, Tile, TileKey, TileRequest, TileRun, TileStrategy,
    COORD_PRECISION, DEFAULT_PRESET, PRESET_SOURCE,
};
