use anyhow::Result;
use placetiles::{generate_tiles, RegionStatus, TileRequest};

use crate::cli::{Cli, TilesArgs};

pub fn run(_cli: &Cli, args: &TilesArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let request = TileRequest {
        source: args.source,
        path: args.path.clone(),
        region: args.region.clone(),
        tile_km: args.tile_km,
        state: args.state.clone(),
    };
    let run = generate_tiles(&request, &config)?;

    for outcome in &run.outcomes {
        match &outcome.status {
            RegionStatus::Tiled { tiles, strategy, coverage } => tracing::info!(
                region = %outcome.region, tile_km = outcome.tile_km, tiles, ?strategy,
                expected = coverage.expected, flagged = coverage.flagged, "tiled"),
            RegionStatus::Failed(reason) => eprintln!("[tiles] skipped {}: {reason}", outcome.region),
        }
    }

    let failed = run.failures().count();
    if failed > 0 {
        eprintln!("[tiles] {failed} of {} regions failed", run.outcomes.len());
    }

    super::emit_tiles(&run.tiles, &args.out)
}
