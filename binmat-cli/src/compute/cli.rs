use clap::{Arg, Command, arg, value_parser};

pub const COMPUTE_CMD: &str = "compute";

pub fn create_compute_cli() -> Command {
    Command::new(COMPUTE_CMD)
        .about("Compute a binned signal matrix for a set of regions over a score file.")
        .arg(Arg::new("regions").help("BED file with the regions, optionally split into groups by #label lines"))
        .arg(Arg::new("scores").help("bigWig or bedGraph file with the signal"))
        .arg(Arg::new("output").help("Path the gzipped matrix is written to"))
        .arg(
            arg!(--binsize <binsize>)
                .help("Length in bases of the non-overlapping bins")
                .value_parser(value_parser!(u32))
                .default_value("10"),
        )
        .arg(
            arg!(--upstream <upstream>)
                .help("Distance upstream of the anchor (or of the region start in body mode)")
                .value_parser(value_parser!(u32))
                .default_value("500"),
        )
        .arg(
            arg!(--downstream <downstream>)
                .help("Distance downstream of the anchor (or of the region end in body mode)")
                .value_parser(value_parser!(u32))
                .default_value("1500"),
        )
        .arg(
            arg!(--body <body>)
                .help("Length the region body is stretched or compressed to; 0 selects reference-point mode")
                .value_parser(value_parser!(u32))
                .default_value("0"),
        )
        .arg(
            arg!(--referencepoint <point>)
                .help("Anchor used in reference-point mode: TSS, TES or center")
                .default_value("TSS"),
        )
        .arg(
            arg!(--averagetype <type>)
                .help("Statistic used to reduce each bin: mean, median, min, max, sum or std")
                .default_value("mean"),
        )
        .arg(
            arg!(--scale <scale>)
                .help("Factor every kept value is multiplied with")
                .value_parser(value_parser!(f64))
                .default_value("1"),
        )
        .arg(
            arg!(--minthreshold <value>)
                .help("Discard rows whose minimum is at or below this value")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--maxthreshold <value>)
                .help("Discard rows whose maximum is at or above this value")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--skipzeros)
                .help("Drop regions whose values are all zero or missing")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--missingdataaszero)
                .help("Treat bases without score data as zero instead of missing")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--nanafterend)
                .help("In TSS mode, mask bins that lie beyond the end of the region")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--numberofprocessors <n>)
                .help("Processors used when a group spans more than one batch")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            arg!(--sortregions <order>)
                .help("Row order of the stored matrix: keep, ascend or descend")
                .default_value("keep"),
        )
        .arg(
            arg!(--sortusing <key>)
                .help("Sort key: a statistic name or region_length")
                .default_value("mean"),
        )
        .arg(arg!(--outnamematrix <path>).help("Also write the per-bin summary table here"))
        .arg(arg!(--outnamesortedregions <path>).help("Also write the kept regions as BED here"))
        .arg(arg!(--outnamedata <path>).help("Also dump the raw matrix values here"))
        .arg(
            arg!(--verbose)
                .help("Report skipped regions and other per-region diagnostics")
                .action(clap::ArgAction::SetTrue),
        )
}
