mod diagnostics;
mod heuristic;
mod partition;
mod preset;
mod sweep;
mod tile;

pub use diagnostics::{diagnose, CoverageReport};
pub use heuristic::{classify, determine_tile_size_km, SizeRule};
pub use partition::{sanitize_name, PartitionInput, PartitionOutcome, Partitioner, COORD_PRECISION};
pub use preset::{BoundsOverride, PresetTable, RegionPreset, DEFAULT_PRESET, PRESET_SOURCE};
pub use sweep::{generate_tiles, sweep_catalog, RegionOutcome, RegionStatus, TileRequest, TileRun};
pub use tile::{LatLng, Tile, TileKey, TileStrategy};
