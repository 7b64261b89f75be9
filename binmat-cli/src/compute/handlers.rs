use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use clap::ArgMatches;

use binmat::codec::save_matrix;
use binmat::dispatch::compute_matrix;
use binmat::export::{save_bed, save_tabulated, save_values};
use binmat::params::{Parameters, RefPoint};
use binmat::signal::ScoreFile;
use binmat::stats::Statistic;
use binmat::store::{SortKey, SortOrder};
use binmat_core::models::FeatureGroups;

pub fn run_compute(matches: &ArgMatches) -> Result<()> {
    let regions = matches
        .get_one::<String>("regions")
        .expect("A path to a region file is required.");
    let scores = matches
        .get_one::<String>("scores")
        .expect("A path to a score file is required.");
    let output = matches
        .get_one::<String>("output")
        .expect("An output path is required.");

    let params = Parameters {
        bin_size: *matches.get_one::<u32>("binsize").unwrap_or(&10),
        upstream: *matches.get_one::<u32>("upstream").unwrap_or(&500),
        downstream: *matches.get_one::<u32>("downstream").unwrap_or(&1500),
        body: *matches.get_one::<u32>("body").unwrap_or(&0),
        ref_point: RefPoint::from_str(
            matches
                .get_one::<String>("referencepoint")
                .map(String::as_str)
                .unwrap_or("TSS"),
        )?,
        avg_type: Statistic::from_str(
            matches
                .get_one::<String>("averagetype")
                .map(String::as_str)
                .unwrap_or("mean"),
        )?,
        scale: *matches.get_one::<f64>("scale").unwrap_or(&1.0),
        min_threshold: matches.get_one::<f64>("minthreshold").copied(),
        max_threshold: matches.get_one::<f64>("maxthreshold").copied(),
        skip_zeros: matches.get_flag("skipzeros"),
        missing_data_as_zero: matches.get_flag("missingdataaszero"),
        nan_after_end: matches.get_flag("nanafterend"),
        proc_number: *matches.get_one::<usize>("numberofprocessors").unwrap_or(&1),
        verbose: matches.get_flag("verbose"),
    };
    params.validate()?;

    let groups = FeatureGroups::try_from(Path::new(regions))?;
    if params.verbose && groups.duplicates > 0 {
        eprintln!(
            "{} ({:.2}%) regions covering the exact same interval were found",
            groups.duplicates,
            100.0 * groups.duplicate_ratio()
        );
    }

    let source = ScoreFile::from_path(scores);
    let mut store = compute_matrix(&source, &groups, &params)?;

    let order = matches
        .get_one::<String>("sortregions")
        .map(String::as_str)
        .unwrap_or("keep");
    if order != "keep" {
        let order = SortOrder::from_str(order)?;
        let key = SortKey::from_str(
            matches
                .get_one::<String>("sortusing")
                .map(String::as_str)
                .unwrap_or("mean"),
        )?;
        store.sort(key, order);
    }

    save_matrix(&store, output)?;

    if let Some(path) = matches.get_one::<String>("outnamematrix") {
        save_tabulated(&store, path)?;
    }
    if let Some(path) = matches.get_one::<String>("outnamesortedregions") {
        save_bed(&store, path)?;
    }
    if let Some(path) = matches.get_one::<String>("outnamedata") {
        save_values(&store, path)?;
    }

    if params.verbose {
        println!("{}", store);
    }

    Ok(())
}
