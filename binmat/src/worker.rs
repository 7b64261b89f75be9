use anyhow::Result;

use binmat_core::models::{Feature, Strand};

use crate::params::{Parameters, RefPoint};
use crate::sampler::sample_zones;
use crate::signal::{RangeValues, ScoreReader, fetch_padded};
use crate::stats::Statistic;
use crate::zones::plan_zones;
use crate::errors::MatrixError;

///
/// The outcome of one worker run over one batch of regions: the rows
/// that survived, the features they belong to (in encounter order), and
/// how many regions had no usable score data.
///
#[derive(Debug)]
pub struct BatchResult {
    pub rows: Vec<Vec<f64>>,
    pub features: Vec<Feature>,
    pub unscored: usize,
}

///
/// Run the per-region pipeline over one batch: plan zones, fetch raw
/// signal, sample into bins, then filter, scale and orient the row.
/// Regions are never reordered; a skipped region is simply absent.
///
pub fn compute_batch(
    reader: &mut dyn ScoreReader,
    features: &[Feature],
    params: &Parameters,
) -> Result<BatchResult> {
    let cols = params.matrix_cols();

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut kept: Vec<Feature> = Vec::new();
    let mut unscored = 0;

    for feature in features {
        let plan = match plan_zones(feature, params) {
            Ok(plan) => plan,
            Err(MatrixError::RegionTooShort(location, bin_size)) => {
                if params.verbose {
                    eprintln!(
                        "Region shorter than window width ({}): {}. Skipping...",
                        bin_size, location
                    );
                }
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if plan.near_chrom_start && params.verbose {
            eprintln!(
                "Region too close to chromosome start for {}.",
                feature.location()
            );
        }

        let (span_start, span_end) = plan.span();
        let raw = match fetch_padded(reader, &feature.chrom, span_start, span_end)? {
            RangeValues::Values(mut values) => {
                if params.missing_data_as_zero {
                    for v in &mut values {
                        if v.is_nan() {
                            *v = 0.0;
                        }
                    }
                }
                values
            }
            RangeValues::UnknownChrom => {
                eprintln!(
                    "Skipping region located at unknown chromosome for {}.",
                    feature.location()
                );
                continue;
            }
            RangeValues::NoData => {
                unscored += 1;
                if params.verbose {
                    eprintln!("No data was found for region {}. Skipping...", feature.location());
                }
                continue;
            }
        };

        let sampled = sample_zones(&raw, &plan.zones, params.avg_type);

        // a row of unexpected width means the sampling degenerated; fall
        // back to an empty row and force the zero-score path
        let (mut row, total_score) = if sampled.len() == cols {
            let total: f64 = sampled.iter().filter(|v| v.is_finite()).sum();
            (sampled, total)
        } else {
            if params.verbose {
                eprintln!("No scores defined for region {}.", feature.location());
            }
            let fill = if params.missing_data_as_zero { 0.0 } else { f64::NAN };
            (vec![fill; cols], 0.0)
        };

        if total_score == 0.0 {
            if params.skip_zeros {
                if params.verbose {
                    eprintln!(
                        "Skipping region with all scores equal to zero for {}.",
                        feature.location()
                    );
                }
                continue;
            } else if params.verbose {
                eprintln!("Warning: All values are zero for {}.", feature.location());
                eprintln!("add --skip-zeros to exclude such regions");
            }
        }

        if let Some(threshold) = params.min_threshold {
            if Statistic::Min.reduce(&row) <= threshold {
                continue;
            }
        }
        if let Some(threshold) = params.max_threshold {
            if Statistic::Max.reduce(&row) >= threshold {
                continue;
            }
        }

        if params.scale != 1.0 {
            for v in &mut row {
                *v *= params.scale;
            }
        }

        if feature.strand == Strand::Reverse {
            row.reverse();
        }

        // mask bins past the true end of the feature so no signal shows
        // up beyond the real boundary
        if params.nan_after_end && params.body == 0 && params.ref_point == RefPoint::Tss {
            let length_in_bins = (feature.width() / params.bin_size) as usize;
            let from = params.upstream_bins() + length_in_bins;
            for v in row.iter_mut().skip(from) {
                *v = f64::NAN;
            }
        }

        rows.push(row);
        kept.push(feature.clone());
    }

    Ok(BatchResult {
        rows,
        features: kept,
        unscored,
    })
}
