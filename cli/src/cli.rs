use std::path::PathBuf;

use placetiles::{LatLng, SourceType};

/// Search-tile generator (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "placetiles", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Tile one region of a geometry source, or sweep all of it
    Tiles(TilesArgs),

    /// List the regions of a geometry source, or look one up
    Regions(RegionsArgs),

    /// Tile a named city window
    Preset(PresetArgs),
}

/// Where tiles go; JSON on stdout when neither is given.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output JSON file of tile records
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write tiles as a GeoJSON FeatureCollection for inspection
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct TilesArgs {
    /// Geometry source: regions (SA2), gccsa, lga or states
    pub source: SourceType,

    /// Boundary file (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,

    /// Region to tile; sweeps every region when omitted
    #[arg(short, long)]
    pub region: Option<String>,

    /// Tile edge in km; chosen per region when omitted
    #[arg(short, long)]
    pub tile_km: Option<u32>,

    /// State label written on every tile
    #[arg(short, long)]
    pub state: Option<String>,

    /// JSON tiling configuration
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(clap::Args, Debug)]
pub struct RegionsArgs {
    /// Geometry source: regions (SA2), gccsa, lga or states
    pub source: SourceType,

    /// Boundary file (.geojson, .json or .shp)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,

    /// Look up one region by name
    #[arg(short, long)]
    pub find: Option<String>,

    /// JSON tiling configuration
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PresetArgs {
    /// Preset name, e.g. Sydney; omit with --list
    #[arg(required_unless_present = "list")]
    pub name: Option<String>,

    /// List preset names and exit
    #[arg(long)]
    pub list: bool,

    /// Tile a window around this point, sized by the `default` preset
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub center: Option<LatLng>,

    /// JSON preset table replacing the built-ins
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub presets: Option<PathBuf>,

    /// JSON tiling configuration
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub out: OutputArgs,
}
