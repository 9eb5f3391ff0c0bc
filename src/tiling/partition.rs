use std::sync::OnceLock;

use geo::{Area, BooleanOps, BoundingRect, Intersects, MultiPolygon, Rect};
use regex::Regex;
use tracing::{debug, info};

use super::{
    diagnostics::{diagnose, CoverageReport},
    tile::{round_to, LatLng, Tile, TileSet, TileStrategy},
};
use crate::{
    config::TilingConfig,
    error::{Result, TilingError},
    geom::{aspect_ratio, expand, make_valid, split_long_axis, square, Projector},
};

/// Decimal places kept on emitted tile corners.
pub const COORD_PRECISION: u32 = 6;

/// One region to be partitioned.
#[derive(Debug, Clone, Copy)]
pub struct PartitionInput<'a> {
    pub region_name: &'a str,
    /// Shape in the geodetic frame (lon/lat degrees).
    pub geometry: &'a MultiPolygon<f64>,
    pub tile_km: u32,
    /// Catalog-provided area; derived from the geometry when `None` or zero.
    pub area_sqkm: Option<f64>,
    /// Passed through to every tile.
    pub state: Option<&'a str>,
    pub source: &'a str,
}

/// Tiles of one region together with the strategy used and its coverage check.
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub tiles: Vec<Tile>,
    pub strategy: TileStrategy,
    pub area_sqkm: f64,
    pub coverage: CoverageReport,
}

/// Splits region polygons into search tiles.
#[derive(Debug, Clone, Copy)]
pub struct Partitioner<'a> {
    projector: &'a Projector,
    config: &'a TilingConfig,
}

impl<'a> Partitioner<'a> {
    pub fn new(projector: &'a Projector, config: &'a TilingConfig) -> Self { Self { projector, config } }

    #[inline] pub fn projector(&self) -> &'a Projector { self.projector }

    #[inline] pub fn config(&self) -> &'a TilingConfig { self.config }

    /// Cover `input.geometry` with tiles of `input.tile_km` edge.
    pub fn partition(&self, input: &PartitionInput<'_>) -> Result<Vec<Tile>> {
        Ok(self.partition_detailed(input)?.tiles)
    }

    /// As [`Partitioner::partition`], also returning the strategy and coverage report.
    pub fn partition_detailed(&self, input: &PartitionInput<'_>) -> Result<PartitionOutcome> {
        let region = input.region_name;
        if input.tile_km == 0 {
            return Err(TilingError::geometry(region, "tile size must be positive"));
        }

        let planar = self.projector.to_planar(input.geometry)
            .map_err(|e| TilingError::geometry(region, e))?;
        let planar = make_valid(&planar);
        let bbox = planar.bounding_rect()
            .ok_or_else(|| TilingError::geometry(region, "empty geometry"))?;
        if !(bbox.width() > 0.0 && bbox.height() > 0.0) {
            return Err(TilingError::geometry(region, "degenerate geometry with zero extent"));
        }

        let area_sqkm = match input.area_sqkm {
            Some(area) if area > 0.0 => area,
            _ => planar.unsigned_area() / 1.0e6,
        };

        let name = sanitize_name(region);
        let (tiles, strategy) = if self.is_single_tile(area_sqkm, &bbox, input.tile_km) {
            (self.single_tile(input, &name, &bbox, area_sqkm)?, TileStrategy::Single)
        } else {
            let tiles = self.grid_tiles(input, &name, &planar, &bbox, area_sqkm)?;
            if tiles.is_empty() {
                debug!(region, "grid produced no tiles, using bounding-box fallback");
                (self.fallback_tiles(input, &name, &bbox, area_sqkm)?, TileStrategy::Fallback)
            } else {
                (tiles, TileStrategy::Grid)
            }
        };

        info!(region, tile_km = input.tile_km, area_sqkm, strategy = ?strategy, tiles = tiles.len(), "region partitioned");
        let coverage = diagnose(region, area_sqkm, input.tile_km, tiles.len(), self.config.diagnostics.max_deviation_pct);

        Ok(PartitionOutcome { tiles, strategy, area_sqkm, coverage })
    }

    /// Small regions (by area, or by extent) get one buffered bounding-box tile.
    fn is_single_tile(&self, area_sqkm: f64, bbox: &Rect<f64>, tile_km: u32) -> bool {
        let config = &self.config.partition;
        let tile_km = f64::from(tile_km);
        let extent_km = bbox.width().max(bbox.height()) / 1000.0;
        area_sqkm <= config.single_tile_area_factor * tile_km * tile_km
            || extent_km <= config.single_tile_extent_factor * tile_km
    }

    /// Buffer (m) added around bounding-box tiles.
    fn buffer_m(&self, area_sqkm: f64, tile_km: u32) -> f64 {
        let config = &self.config.partition;
        let fraction = if area_sqkm < config.small_buffer_area_sqkm { config.small_buffer_fraction }
                       else { config.large_buffer_fraction };
        fraction * f64::from(tile_km) * 1000.0
    }

    fn single_tile(&self, input: &PartitionInput<'_>, name: &str, bbox: &Rect<f64>, area_sqkm: f64) -> Result<Vec<Tile>> {
        let rect = expand(bbox, self.buffer_m(area_sqkm, input.tile_km));
        Ok(vec![self.make_tile(input, format!("{name}_single"), rect, TileStrategy::Single)?])
    }

    /// Row-major grid of `tile_km` squares from the bounding box's lower-left
    /// corner, keeping squares whose overlap with the shape reaches the threshold.
    fn grid_tiles(&self, input: &PartitionInput<'_>, name: &str, planar: &MultiPolygon<f64>, bbox: &Rect<f64>, area_sqkm: f64) -> Result<Vec<Tile>> {
        let config = &self.config.partition;
        let tile_m = f64::from(input.tile_km) * 1000.0;
        let min_overlap = if area_sqkm < config.overlap_area_split_sqkm { config.small_region_min_overlap }
                          else { config.large_region_min_overlap };

        let rows = (bbox.height() / tile_m).ceil().max(1.0) as usize;
        let cols = (bbox.width() / tile_m).ceil().max(1.0) as usize;
        let origin = bbox.min();

        let mut tiles = TileSet::new(config.dedup_precision);
        for row in 0..rows {
            let y = origin.y + row as f64 * tile_m;

            // Clip once per row so each cell intersects a small piece of the shape.
            let strip = Rect::new((origin.x, y), (origin.x + cols as f64 * tile_m, y + tile_m)).to_polygon();
            let row_shape = planar.intersection(&strip);
            if row_shape.0.is_empty() { continue }

            for col in 0..cols {
                let cell = square(origin.x + col as f64 * tile_m, y, tile_m);
                let cell_polygon = cell.to_polygon();
                if !row_shape.intersects(&cell_polygon) { continue }

                let overlap = row_shape.intersection(&cell_polygon).unsigned_area() / (tile_m * tile_m);
                if overlap < min_overlap { continue }

                let tile = self.make_tile(input, format!("{name}_r{row}_c{col}"), cell, TileStrategy::Grid)?;
                if !tiles.insert(tile) {
                    debug!(region = input.region_name, row, col, "dropping duplicate tile");
                }
            }
        }

        debug!(region = input.region_name, rows, cols, min_overlap, kept = tiles.len(), "grid tiling done");
        Ok(tiles.into_vec())
    }

    /// One or two buffered slabs of the bounding box, split along the long axis
    /// when the box is elongated.
    fn fallback_tiles(&self, input: &PartitionInput<'_>, name: &str, bbox: &Rect<f64>, area_sqkm: f64) -> Result<Vec<Tile>> {
        let pieces = if aspect_ratio(bbox) > self.config.partition.fallback_aspect_ratio { 2 } else { 1 };
        let buffer = self.buffer_m(area_sqkm, input.tile_km);

        let mut tiles = TileSet::new(self.config.partition.dedup_precision);
        for (i, piece) in split_long_axis(bbox, pieces).iter().enumerate() {
            tiles.insert(self.make_tile(input, format!("{name}_fallback_{i}"), expand(piece, buffer), TileStrategy::Fallback)?);
        }
        Ok(tiles.into_vec())
    }

    /// Unproject a planar box into a tile with rounded corners.
    fn make_tile(&self, input: &PartitionInput<'_>, tile_name: String, planar: Rect<f64>, strategy: TileStrategy) -> Result<Tile> {
        let rect = self.projector.rect_to_geodetic(&planar)
            .map_err(|e| TilingError::geometry(input.region_name, e))?;
        let corner = |lat: f64, lon: f64| LatLng::new(round_to(lat, COORD_PRECISION), round_to(lon, COORD_PRECISION));

        Ok(Tile {
            region: input.region_name.to_string(),
            state: input.state.map(str::to_string),
            source: input.source.to_string(),
            tile_name,
            low: corner(rect.min().y, rect.min().x),
            high: corner(rect.max().y, rect.max().x),
            planar,
            strategy,
        })
    }
}

/// Lowercase `name` with every run of non-alphanumerics replaced by `_`.
pub fn sanitize_name(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let pattern = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid pattern"));

    let sanitized = pattern.replace_all(&name.trim().to_lowercase(), "_").trim_matches('_').to_string();
    if sanitized.is_empty() { "region".to_string() } else { sanitized }
}
