use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use super::{
    diagnostics::CoverageReport,
    heuristic::determine_tile_size_km,
    partition::{PartitionInput, PartitionOutcome, Partitioner},
    tile::{Tile, TileStrategy},
};
use crate::{
    catalog::{Region, RegionCatalog, SourceType},
    config::TilingConfig,
    error::{Result, TilingError},
    geom::Projector,
};

/// What to tile: one named region of a source, or all of it.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub source: SourceType,
    pub path: PathBuf,
    /// Region to tile; `None` sweeps the whole catalog.
    pub region: Option<String>,
    /// Tile edge (km); chosen per region by the heuristic when `None`.
    pub tile_km: Option<u32>,
    /// Label copied onto every tile, overriding each region's own state.
    pub state: Option<String>,
}

impl TileRequest {
    pub fn new(source: SourceType, path: impl Into<PathBuf>) -> Self {
        Self { source, path: path.into(), region: None, tile_km: None, state: None }
    }

    pub fn region(mut self, name: &str) -> Self {
        self.region = Some(name.to_string());
        self
    }

    pub fn tile_km(mut self, tile_km: u32) -> Self {
        self.tile_km = Some(tile_km);
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegionStatus {
    Tiled { tiles: usize, strategy: TileStrategy, coverage: CoverageReport },
    Failed(String),
}

/// Per-region record of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOutcome {
    pub region: String,
    pub tile_km: u32,
    pub status: RegionStatus,
}

impl RegionOutcome {
    #[inline] pub fn is_ok(&self) -> bool { matches!(self.status, RegionStatus::Tiled { .. }) }
}

/// Tiles of a run, plus one outcome per region attempted (sorted by region name).
#[derive(Debug, Clone, Default)]
pub struct TileRun {
    pub tiles: Vec<Tile>,
    pub outcomes: Vec<RegionOutcome>,
}

impl TileRun {
    pub fn failures(&self) -> impl Iterator<Item = &RegionOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }
}

/// Load the request's catalog and tile either the named region or every region.
pub fn generate_tiles(request: &TileRequest, config: &TilingConfig) -> Result<TileRun> {
    config.validate()?;
    let projector = Projector::new(&config.projection)?;
    let catalog = RegionCatalog::load(request.source, &request.path, &projector)?;

    let Some(name) = request.region.as_deref() else {
        return sweep_catalog(&catalog, request.tile_km, request.state.as_deref(), config);
    };

    let region = catalog.resolve_with(name, &config.lookup)?;
    let partitioner = Partitioner::new(&projector, config);
    let tile_km = request.tile_km.unwrap_or_else(|| determine_tile_size_km(region, catalog.source(), &config.heuristic));

    let outcome = partitioner.partition_detailed(&input(region, catalog.source(), tile_km, request.state.as_deref()))?;
    let record = tiled(region, tile_km, &outcome);
    Ok(TileRun { tiles: outcome.tiles, outcomes: vec![record] })
}

/// Tile every region of `catalog` in parallel. A failing region is logged and
/// recorded in the run's outcomes; it contributes no tiles.
pub fn sweep_catalog(catalog: &RegionCatalog, tile_km: Option<u32>, state: Option<&str>, config: &TilingConfig) -> Result<TileRun> {
    config.validate()?;
    // Fail fast on a bad projection before fanning out.
    Projector::new(&config.projection)?;

    let source = catalog.source();
    info!(%source, regions = catalog.len(), "sweeping catalog");

    let mut results = catalog.all_regions()
        .par_iter()
        .map_init(
            || Projector::new(&config.projection),
            |projector, region| {
                let tile_km = tile_km.unwrap_or_else(|| determine_tile_size_km(region, source, &config.heuristic));
                let partitioned = match projector {
                    Ok(projector) => Partitioner::new(projector, config)
                        .partition_detailed(&input(region, source, tile_km, state)),
                    Err(e) => Err(TilingError::Projection(e.to_string())),
                };

                match partitioned {
                    Ok(outcome) => (tiled(region, tile_km, &outcome), outcome.tiles),
                    Err(e) => {
                        warn!(region = region.display_name(), error = %e, "skipping region");
                        let failed = RegionOutcome {
                            region: region.display_name().to_string(),
                            tile_km,
                            status: RegionStatus::Failed(e.to_string()),
                        };
                        (failed, Vec::new())
                    }
                }
            },
        )
        .collect::<Vec<_>>();

    results.sort_by(|(a, _), (b, _)| a.region.cmp(&b.region));

    let mut run = TileRun::default();
    for (outcome, tiles) in results {
        run.outcomes.push(outcome);
        run.tiles.extend(tiles);
    }

    info!(%source, tiles = run.tiles.len(), failed = run.failures().count(), "sweep finished");
    Ok(run)
}

fn input<'a>(region: &'a Region, source: SourceType, tile_km: u32, state: Option<&'a str>) -> PartitionInput<'a> {
    PartitionInput {
        region_name: region.display_name(),
        geometry: region.geometry(),
        tile_km,
        area_sqkm: Some(region.area_sqkm()),
        state: state.or(region.state()),
        source: source.tag(),
    }
}

fn tiled(region: &Region, tile_km: u32, outcome: &PartitionOutcome) -> RegionOutcome {
    RegionOutcome {
        region: region.display_name().to_string(),
        tile_km,
        status: RegionStatus::Tiled {
            tiles: outcome.tiles.len(),
            strategy: outcome.strategy,
            coverage: outcome.coverage,
        },
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, MultiPolygon, Rect};

    use super::*;

    fn planar_square(x: f64, y: f64, km: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new(Coord { x, y }, Coord { x: x + km * 1000.0, y: y + km * 1000.0 }).to_polygon()])
    }

    #[test]
    fn sweep_isolates_failing_regions() {
        let config = TilingConfig::default();
        let projector = Projector::new(&config.projection).unwrap();

        let good = projector.to_geodetic(&planar_square(1_500_000.0, -3_800_000.0, 40.0)).unwrap();
        let regions = [
            Region::new("Wollondilly", good, 1_600.0).with_state("New South Wales"),
            Region::new("Empty", MultiPolygon::new(vec![]), 0.0),
        ];
        let catalog = RegionCatalog::from_regions(SourceType::Lga, regions);

        let run = sweep_catalog(&catalog, Some(10), None, &config).unwrap();
        assert_eq!(run.outcomes.len(), 2);
        assert_eq!(run.outcomes[0].region, "Empty");
        assert!(matches!(run.outcomes[0].status, RegionStatus::Failed(_)));
        assert!(run.outcomes[1].is_ok());
        assert_eq!(run.failures().count(), 1);

        assert!(!run.tiles.is_empty());
        assert!(run.tiles.iter().all(|tile| tile.region == "Wollondilly" && tile.source == "lga"));
        assert!(run.tiles.iter().all(|tile| tile.state.as_deref() == Some("New South Wales")));
    }

    #[test]
    fn request_state_overrides_region_state() {
        let config = TilingConfig::default();
        let projector = Projector::new(&config.projection).unwrap();
        let shape = projector.to_geodetic(&planar_square(1_200_000.0, -3_700_000.0, 2.0)).unwrap();
        let catalog = RegionCatalog::from_regions(SourceType::Sa2, [Region::new("Carlton", shape, 4.0).with_state("Victoria")]);

        let run = sweep_catalog(&catalog, None, Some("VIC"), &config).unwrap();
        assert_eq!(run.tiles.len(), 1);
        assert_eq!(run.tiles[0].state.as_deref(), Some("VIC"));
        assert_eq!(run.tiles[0].source, "regions");
    }
}
