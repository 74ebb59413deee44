mod catalog;
mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::commands::run_cli;
use cli::opts::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose);
    run_cli(args)
}
