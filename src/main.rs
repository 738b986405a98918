//! tensorprep smoke runner.
//!
//! A thin wrapper over the `cli` module: parse args, run the checks, and exit
//! with an error status on the first failure. For programmatic use, prefer the
//! library API (`tensorprep::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
