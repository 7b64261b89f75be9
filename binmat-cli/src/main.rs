mod compute;
mod dump;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "binmat";
    pub const BIN_NAME: &str = "binmat";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Compute, sort and export binned signal matrices over sets of genomic regions.")
        .subcommand_required(true)
        .subcommand(compute::cli::create_compute_cli())
        .subcommand(dump::cli::create_dump_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // COMPUTE
        //
        Some((compute::cli::COMPUTE_CMD, matches)) => {
            compute::handlers::run_compute(matches)?;
        }

        //
        // DUMP
        //
        Some((dump::cli::DUMP_CMD, matches)) => {
            dump::handlers::run_dump(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
