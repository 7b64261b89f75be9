use std::str::FromStr;

use anyhow::Result;
use clap::ArgMatches;

use binmat::codec::{load_matrix, save_matrix};
use binmat::export::{save_bed, save_tabulated, save_values};
use binmat::store::{SortKey, SortOrder};

pub fn run_dump(matches: &ArgMatches) -> Result<()> {
    let matrix = matches
        .get_one::<String>("matrix")
        .expect("A path to a matrix file is required.");

    let mut store = load_matrix(matrix)?;

    if let Some(labels) = matches.get_many::<String>("grouplabels") {
        let labels: Vec<String> = labels.cloned().collect();
        store.relabel(&labels)?;
    }

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

    if let Some(path) = matches.get_one::<String>("outnamematrix") {
        save_tabulated(&store, path)?;
    }
    if let Some(path) = matches.get_one::<String>("outnamesortedregions") {
        save_bed(&store, path)?;
    }
    if let Some(path) = matches.get_one::<String>("outnamedata") {
        save_values(&store, path)?;
    }
    if let Some(path) = matches.get_one::<String>("output") {
        save_matrix(&store, path)?;
    }

    Ok(())
}
