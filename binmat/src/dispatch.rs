use anyhow::{Context, Result};
use indicatif::ProgressBar;
use ndarray::Array2;
use rayon::prelude::*;

use binmat_core::models::{Feature, FeatureGroups};

use crate::consts::{BATCH_SIZE, UNSCORED_WARN_FRACTION};
use crate::errors::MatrixError;
use crate::params::Parameters;
use crate::signal::ScoreSource;
use crate::store::MatrixStore;
use crate::worker::{BatchResult, compute_batch};

///
/// Compute the full grouped matrix: partition every group into batches
/// of [BATCH_SIZE] regions, run the worker over each batch (on a thread
/// pool when there is more than one batch and more than one processor
/// is configured), and merge the partial results in submission order.
///
/// Row order in the result always equals the input region order
/// restricted to survivors, independent of the parallelism degree.
///
pub fn compute_matrix<S: ScoreSource + Sync>(
    source: &S,
    groups: &FeatureGroups,
    params: &Parameters,
) -> Result<MatrixStore> {
    params.validate()?;

    let mut store = MatrixStore::new(params.clone());

    for (label, features) in groups.groups() {
        let group = compute_group(source, label, features, params)?;
        store.push_group(label.clone(), group.0, group.1);
    }

    Ok(store)
}

fn compute_group<S: ScoreSource + Sync>(
    source: &S,
    label: &str,
    features: &[Feature],
    params: &Parameters,
) -> Result<(Vec<Feature>, Array2<f64>)> {
    let batches: Vec<&[Feature]> = features.chunks(BATCH_SIZE).collect();
    let bar = ProgressBar::new(batches.len() as u64);

    let results: Vec<BatchResult> = if batches.len() > 1 && params.proc_number > 1 {
        if params.verbose {
            println!(
                "'{}' total workers: {}, using {} processors",
                label,
                batches.len(),
                params.proc_number
            );
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.proc_number)
            .build()
            .context("Unable to create thread pool")?;
        pool.install(|| {
            batches
                .par_iter()
                .map(|batch| {
                    let mut reader = source.open()?;
                    let result = compute_batch(reader.as_mut(), batch, params);
                    bar.inc(1);
                    result
                })
                .collect::<Result<Vec<_>>>()
        })?
    } else {
        batches
            .iter()
            .map(|batch| {
                let mut reader = source.open()?;
                let result = compute_batch(reader.as_mut(), batch, params);
                bar.inc(1);
                result
            })
            .collect::<Result<Vec<_>>>()?
    };
    bar.finish_and_clear();

    // merge in batch order, which is the original region order
    let cols = params.matrix_cols();
    let mut merged_features: Vec<Feature> = Vec::new();
    let mut flat: Vec<f64> = Vec::new();
    let mut unscored = 0;
    for result in results {
        merged_features.extend(result.features);
        for row in result.rows {
            flat.extend(row);
        }
        unscored += result.unscored;
    }

    if unscored_warning(unscored, features.len()) {
        let percent = 100.0 * unscored as f64 / features.len() as f64;
        eprintln!(
            "\nWarning: {:.2}% of regions in group '{}' are not associated to a score \
             in the given {} file. Check that the chromosome names in the regions file \
             are consistent with the chromosome names in the {} file and that both \
             files refer to the same species.\n",
            percent,
            label,
            source.kind(),
            source.kind()
        );
    }

    if merged_features.is_empty() {
        return Err(MatrixError::EmptyResult(label.to_string()).into());
    }

    let matrix = Array2::from_shape_vec((merged_features.len(), cols), flat)
        .context("Merged submatrices do not form a rectangular matrix")?;

    Ok((merged_features, matrix))
}

///
/// Whether the unscored count for a group is pervasive enough to warrant
/// an aggregate warning: strictly more than 75% of the group's regions.
///
pub fn unscored_warning(unscored: usize, total: usize) -> bool {
    unscored as f64 > total as f64 * UNSCORED_WARN_FRACTION
}
