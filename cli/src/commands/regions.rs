use anyhow::Result;
use placetiles::{classify, Projector, RegionCatalog};

use crate::cli::{Cli, RegionsArgs};

pub fn run(_cli: &Cli, args: &RegionsArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let projector = Projector::new(&config.projection)?;
    let catalog = RegionCatalog::load(args.source, &args.path, &projector)?;

    let regions = match &args.find {
        Some(name) => vec![catalog.resolve_with(name, &config.lookup)?],
        None => catalog.all_regions().iter().collect(),
    };

    println!("name\tstate\tarea_sqkm\ttile_km\trule");
    for region in regions {
        let (tile_km, rule) = classify(region, catalog.source(), &config.heuristic);
        println!(
            "{}\t{}\t{:.2}\t{tile_km}\t{rule:?}",
            region.display_name(),
            region.state().unwrap_or("-"),
            region.area_sqkm(),
        );
    }
    Ok(())
}
