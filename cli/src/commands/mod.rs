pub mod preset;
pub mod regions;
pub mod tiles;

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use placetiles::{ensure_parent_dir_exists, write_tiles_geojson, write_tiles_json, Tile, TilingConfig};

use crate::cli::OutputArgs;

/// Defaults, or the (validated) JSON file at `path`.
pub(crate) fn load_config(path: Option<&Path>) -> Result<TilingConfig> {
    Ok(match path {
        Some(path) => TilingConfig::from_json_file(path)?,
        None => TilingConfig::default(),
    })
}

/// Write tiles where `out` says, or as JSON to stdout.
pub(crate) fn emit_tiles(tiles: &[Tile], out: &OutputArgs) -> Result<()> {
    if let Some(path) = &out.output {
        ensure_parent_dir_exists(path)?;
        write_tiles_json(path, tiles).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(tiles = tiles.len(), path = %path.display(), "wrote tiles");
    }
    if let Some(path) = &out.geojson {
        ensure_parent_dir_exists(path)?;
        write_tiles_geojson(path, tiles).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(tiles = tiles.len(), path = %path.display(), "wrote tile GeoJSON");
    }

    if out.output.is_none() && out.geojson.is_none() {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, tiles)?;
        writeln!(stdout)?;
    }
    Ok(())
}
