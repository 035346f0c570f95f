//! LANDSCENE CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch
//! to single-scene or pool processing, and exit with appropriate
//! status. For programmatic use, prefer the library API
//! (`landscene::plan_scene` / `landscene::execute_plan`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
