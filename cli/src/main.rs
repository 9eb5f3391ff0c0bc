mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};
use commands::{preset, regions, tiles};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Tiles(args) => tiles::run(&cli, args),
        Commands::Regions(args) => regions::run(&cli, args),
        Commands::Preset(args) => preset::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
