use anyhow::{Context, Result};
use placetiles::{Partitioner, PresetTable, Projector};

use crate::cli::{Cli, PresetArgs};

pub fn run(_cli: &Cli, args: &PresetArgs) -> Result<()> {
    let table = match &args.presets {
        Some(path) => PresetTable::from_json_file(path)?,
        None => PresetTable::builtin(),
    };

    if args.list {
        for name in table.names() { println!("{name}") }
        return Ok(());
    }

    let name = args.name.as_deref().context("a preset name is required")?;
    let config = super::load_config(args.config.as_deref())?;
    let projector = Projector::new(&config.projection)?;
    let partitioner = Partitioner::new(&projector, &config);
    let tiles = match args.center {
        Some(center) => table.tiles_around(name, center, &partitioner)?,
        None => table.tiles_for(name, &partitioner)?,
    };

    eprintln!("[preset] {name}: {} tiles", tiles.len());
    super::emit_tiles(&tiles, &args.out)
}
