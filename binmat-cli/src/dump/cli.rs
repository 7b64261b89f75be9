use clap::{Arg, Command, arg};

pub const DUMP_CMD: &str = "dump";

pub fn create_dump_cli() -> Command {
    Command::new(DUMP_CMD)
        .about("Load a stored matrix, optionally sort or relabel it, and export tables.")
        .arg(Arg::new("matrix").help("Gzipped matrix file written by the compute subcommand"))
        .arg(
            arg!(--grouplabels <labels>)
                .help("New group labels, one per existing group")
                .value_delimiter(','),
        )
        .arg(
            arg!(--sortregions <order>)
                .help("Row order before export: keep, ascend or descend")
                .default_value("keep"),
        )
        .arg(
            arg!(--sortusing <key>)
                .help("Sort key: a statistic name or region_length")
                .default_value("mean"),
        )
        .arg(arg!(--outnamematrix <path>).help("Write the per-bin summary table here"))
        .arg(arg!(--outnamesortedregions <path>).help("Write the regions as BED here"))
        .arg(arg!(--outnamedata <path>).help("Dump the raw matrix values here"))
        .arg(arg!(--output <path>).help("Write the (possibly modified) matrix back out here"))
}
